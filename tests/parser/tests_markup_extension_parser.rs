//! Markup-extension parser tests.

#![allow(clippy::unwrap_used)]

use axaml::parser::{MarkupExtensionParser, MarkupExtensionState};
use rstest::rstest;

fn parse_all(text: &str) -> MarkupExtensionParser<'_> {
    MarkupExtensionParser::parse(text, text.len())
}

#[test]
fn test_example_binding_positional_argument() {
    let parser = parse_all("{Binding ");

    assert_eq!(parser.state(), MarkupExtensionState::AttributeValue);
    assert_eq!(parser.extension_name(), Some("Binding"));
    assert_eq!(parser.attribute_name(), None);
    assert_eq!(parser.attributes_count(), 0);
    assert_eq!(parser.nesting_level(), 0);
}

#[rstest]
#[case("", MarkupExtensionState::None)]
#[case("plain text", MarkupExtensionState::None)]
#[case("{", MarkupExtensionState::StartElement)]
#[case("{x:Sta", MarkupExtensionState::StartElement)]
#[case("{Binding Pa", MarkupExtensionState::AttributeValue)]
#[case("{Binding Path=", MarkupExtensionState::BeforeAttributeValue)]
#[case("{Binding Path=Name, ", MarkupExtensionState::StartAttribute)]
#[case("{Binding Path=Name, Mo", MarkupExtensionState::StartAttribute)]
#[case("{Binding Path=Name, Mode ", MarkupExtensionState::AfterAttribute)]
#[case("{Binding Path=Name, Mode=One", MarkupExtensionState::AttributeValue)]
#[case("{Binding Path=Name, Mode=OneWay}", MarkupExtensionState::None)]
#[case("{Binding Converter={StaticResource Conv}", MarkupExtensionState::InsideElement)]
fn test_state_at_end(#[case] text: &str, #[case] expected: MarkupExtensionState) {
    assert_eq!(parse_all(text).state(), expected, "input: {text:?}");
}

#[rstest]
#[case("{Binding Path=Name, Mode=One", Some("Mode"), Some("One"), 1)]
#[case("{Binding Path =Na", Some("Path"), Some("Na"), 0)]
#[case("{Binding Name, Converter=", Some("Converter"), None, 1)]
#[case("{Binding A, B, C", Some("C"), None, 2)]
fn test_argument_tracking(
    #[case] text: &str,
    #[case] name: Option<&str>,
    #[case] value: Option<&str>,
    #[case] count: usize,
) {
    let parser = parse_all(text);
    assert_eq!(parser.attribute_name(), name, "input: {text:?}");
    assert_eq!(parser.attribute_value(), value, "input: {text:?}");
    assert_eq!(parser.attributes_count(), count, "input: {text:?}");
}

#[test]
fn test_nested_extension_inside_named_argument() {
    let text = "{Binding Path=Items, Converter={StaticResource Co";
    let parser = parse_all(text);

    assert_eq!(parser.nesting_level(), 1);
    assert_eq!(parser.extension_name(), Some("StaticResource"));
    assert_eq!(parser.state(), MarkupExtensionState::AttributeValue);
    assert_eq!(parser.attribute_value(), Some("Co"));

    let name = parser.extension_name_range().unwrap();
    assert_eq!(&text[name], "StaticResource");
}

#[test]
fn test_outer_context_restored_after_nested_close() {
    let text = "{Binding Path=Items, Converter={StaticResource Conv}, Fall";
    let parser = parse_all(text);

    assert_eq!(parser.nesting_level(), 0);
    assert_eq!(parser.extension_name(), Some("Binding"));
    assert_eq!(parser.state(), MarkupExtensionState::StartAttribute);
    assert_eq!(parser.attribute_name(), Some("Fall"));
    assert_eq!(parser.attributes_count(), 2);
}

#[test]
fn test_doubly_nested_extension() {
    let parser = parse_all("{MultiBinding {Binding Source={x:Static local:Ids.");
    assert_eq!(parser.nesting_level(), 2);
    assert_eq!(parser.extension_name(), Some("x:Static"));
    assert_eq!(parser.attribute_value(), Some("local:Ids."));
}

#[test]
fn test_quoted_argument_value() {
    let parser = parse_all("{Binding Price, StringFormat='Total: {0}");
    assert_eq!(parser.state(), MarkupExtensionState::AttributeValue);
    assert_eq!(parser.attribute_name(), Some("StringFormat"));
    assert_eq!(parser.attribute_value(), Some("Total: {0}"));
    assert_eq!(parser.nesting_level(), 0);
}

#[test]
fn test_literal_escape_disables_parsing() {
    let parser = parse_all("{}{Binding Path=");
    assert!(parser.is_literal());
    assert_eq!(parser.state(), MarkupExtensionState::None);
    assert_eq!(parser.extension_name(), None);
}

#[test]
fn test_leading_whitespace_before_name() {
    let parser = parse_all("{ Binding ");
    assert_eq!(parser.extension_name(), Some("Binding"));
    assert_eq!(parser.state(), MarkupExtensionState::AttributeValue);
}

#[test]
fn test_value_span_ends_at_caret() {
    let text = "{Binding Path=Na";
    let parser = parse_all(text);
    let value = parser.attribute_value_range().unwrap();
    assert_eq!(&text[value], "Na");
    assert_eq!(usize::from(value.end()), text.len());
}

#[test]
fn test_every_offset_is_safe() {
    let text = "{Binding Päth=Nàme, Converter={StaticResource ç}, StringFormat='{}{0}', FallbackValue={x:Null}}}{";
    for offset in 0..=text.len() + 2 {
        let parser = MarkupExtensionParser::parse(text, offset);
        let _ = parser.extension_name();
        let _ = parser.attribute_name();
        let _ = parser.attribute_value();
    }
}

#[test]
fn test_parsing_a_prefix_matches_cutting_the_text() {
    let text = "{Binding Path=Items, Converter={StaticResource Conv}, Mode=OneWay}";
    for offset in 0..=text.len() {
        let cut = MarkupExtensionParser::parse(text, offset);
        let prefix = parse_all(&text[..offset]);
        assert_eq!(cut.state(), prefix.state(), "offset {offset}");
        assert_eq!(cut.nesting_level(), prefix.nesting_level(), "offset {offset}");
        assert_eq!(cut.attribute_name(), prefix.attribute_name(), "offset {offset}");
    }
}
