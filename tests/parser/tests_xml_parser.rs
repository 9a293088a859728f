//! Tag/attribute parser tests.
//!
//! Every document here is cut off mid-typing, the way an editor hands it
//! over when completion is requested.

#![allow(clippy::unwrap_used)]

use axaml::parser::{XmlParser, XmlParserState};
use rstest::rstest;

const WINDOW: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Window xmlns="https://github.com/avaloniaui"
        xmlns:x="http://schemas.microsoft.com/winfx/2006/xaml"
        x:Class="MyApp.MainWindow"
        x:DataType="vm:MainViewModel">
  <!-- toolbar -->
  <StackPanel Orientation="Horizontal">
    <Button Content="{Binding Save}" />
    <TextBlock Text="Ready" />
  </StackPanel>
  <Grid>
  </Grid>
</Window>
"#;

// =============================================================================
// STATE AT THE CARET
// =============================================================================

#[rstest]
#[case("", XmlParserState::None)]
#[case("text", XmlParserState::None)]
#[case("<", XmlParserState::StartElement)]
#[case("<Butt", XmlParserState::StartElement)]
#[case("<Button ", XmlParserState::InsideElement)]
#[case("<Button Con", XmlParserState::StartAttribute)]
#[case("<Button Content=", XmlParserState::BeforeAttributeValue)]
#[case("<Button Content=\"Sa", XmlParserState::AttributeValue)]
#[case("<Button Content='Sa", XmlParserState::AttributeValue)]
#[case("<Button Content=\"Save\"", XmlParserState::AfterAttributeValue)]
#[case("<Button Content=\"Save\" ", XmlParserState::InsideElement)]
#[case("<Button />", XmlParserState::None)]
#[case("<Button></Button>", XmlParserState::None)]
#[case("<!-- <Button", XmlParserState::InsideComment)]
#[case("<![CDATA[ <Button", XmlParserState::InsideCdata)]
fn test_state_at_end(#[case] text: &str, #[case] expected: XmlParserState) {
    let parser = XmlParser::parse(text, text.len());
    assert_eq!(parser.state(), expected, "input: {text:?}");
}

#[test]
fn test_example_title_attribute_value() {
    let text = r#"<Window xmlns="a" Title=""#;
    let parser = XmlParser::parse(text, text.len());

    assert_eq!(parser.state(), XmlParserState::AttributeValue);
    assert_eq!(parser.attribute_name(), Some("Title"));
    assert_eq!(parser.attribute_value(), Some(""));
    assert_eq!(parser.tag_name(), Some("Window"));
    assert_eq!(parser.nesting_level(), 1);
}

#[test]
fn test_spans_point_into_text() {
    let text = r#"<Button Content="Save" Width="12"#;
    let parser = XmlParser::parse(text, text.len());

    let name = parser.attribute_name_range().unwrap();
    assert_eq!(&text[name], "Width");
    let value = parser.attribute_value_range().unwrap();
    assert_eq!(&text[value], "12");
    assert_eq!(usize::from(value.end()), text.len());
    let tag = parser.tag_name_range().unwrap();
    assert_eq!(&text[tag], "Button");
}

#[rstest]
#[case("<Button Content=\"Save\" ")]
#[case("<Button Content=\"Save\"/")]
#[case("<Button Width=12 ")]
#[case("<Button IsDefault/")]
fn test_finished_attribute_is_not_current(#[case] text: &str) {
    let parser = XmlParser::parse(text, text.len());
    assert_eq!(parser.state(), XmlParserState::InsideElement);
    assert_eq!(parser.attribute_name(), None, "input: {text:?}");
    assert_eq!(parser.attribute_value(), None, "input: {text:?}");
    assert_eq!(parser.tag_name(), Some("Button"));
}

#[test]
fn test_closing_tag_name_excludes_slash() {
    let text = "<Grid></Gr";
    let parser = XmlParser::parse(text, text.len());
    assert!(parser.is_closing_tag());
    assert_eq!(parser.tag_name(), Some("Gr"));
}

#[test]
fn test_unquoted_value_ends_at_whitespace() {
    let text = "<Button Width=12 Height=3";
    let parser = XmlParser::parse(text, text.len());
    assert_eq!(parser.state(), XmlParserState::AttributeValue);
    assert_eq!(parser.attribute_name(), Some("Height"));
    assert_eq!(parser.attribute_value(), Some("3"));
}

#[test]
fn test_stray_angle_bracket_restarts_tag() {
    let text = "<Grid><Button Content=\"x\" <Tex";
    let parser = XmlParser::parse(text, text.len());
    assert_eq!(parser.state(), XmlParserState::StartElement);
    assert_eq!(parser.tag_name(), Some("Tex"));
    assert_eq!(parser.nesting_level(), 2);
    assert_eq!(parser.enclosing_tag_name(1), Some("Grid"));
}

// =============================================================================
// NESTING
// =============================================================================

#[test]
fn test_nesting_through_document() {
    let caret = WINDOW.find("<TextBlock").unwrap() + "<TextBlock Te".len();
    let parser = XmlParser::parse(WINDOW, caret);

    assert_eq!(parser.state(), XmlParserState::StartAttribute);
    assert_eq!(parser.attribute_name(), Some("Te"));
    assert_eq!(parser.nesting_level(), 3);
    assert_eq!(parser.enclosing_tag_name(0), Some("TextBlock"));
    assert_eq!(parser.enclosing_tag_name(1), Some("StackPanel"));
    assert_eq!(parser.enclosing_tag_name(2), Some("Window"));
    assert_eq!(
        parser.containing_tag_start(),
        Some(WINDOW.find("<TextBlock").unwrap())
    );
}

#[test]
fn test_ancestor_data_type_lookup() {
    let caret = WINDOW.find("Ready").unwrap();
    let parser = XmlParser::parse(WINDOW, caret);

    assert_eq!(parser.attribute_name(), Some("Text"));
    assert_eq!(
        parser.find_ancestor_attribute_value("x:DataType", 8),
        Some("vm:MainViewModel")
    );
    assert_eq!(
        parser.find_ancestor_attribute_value("Orientation", 8),
        Some("Horizontal")
    );
    assert_eq!(parser.find_ancestor_attribute_value("x:DataType", 1), None);
}

#[test]
fn test_comment_does_not_change_nesting() {
    let after = WINDOW.find("-->").unwrap() + 3;
    let parser = XmlParser::parse(WINDOW, after);
    assert_eq!(parser.state(), XmlParserState::None);
    assert_eq!(parser.nesting_level(), 1);
}

#[test]
fn test_whole_document_closes_everything() {
    let parser = XmlParser::parse(WINDOW, WINDOW.len());
    assert_eq!(parser.state(), XmlParserState::None);
    assert_eq!(parser.nesting_level(), 0);
}

#[test]
fn test_incremental_parse_matches_fresh_parse() {
    let mid = WINDOW.find("<Button").unwrap();
    let mut parser = XmlParser::parse(WINDOW, mid);
    parser.parse_until(WINDOW.len() - 10);
    let fresh = XmlParser::parse(WINDOW, WINDOW.len() - 10);

    assert_eq!(parser.state(), fresh.state());
    assert_eq!(parser.containing_tags(), fresh.containing_tags());
    assert_eq!(parser.position(), fresh.position());
}

#[test]
fn test_parse_until_never_rewinds() {
    let mut parser = XmlParser::parse(WINDOW, 40);
    parser.parse_until(10);
    assert_eq!(parser.position(), 40);
}

// =============================================================================
// SIBLING LOOKAHEAD
// =============================================================================

#[test]
fn test_seek_next_sibling_from_attribute() {
    let caret = WINDOW.find("Orientation").unwrap();
    let mut parser = XmlParser::parse(WINDOW, caret);
    let sibling = parser.seek_next_sibling_start_tag().unwrap();
    assert!(WINDOW[sibling..].starts_with("<Grid>"));
}

#[test]
fn test_seek_next_sibling_skips_comment() {
    let text = "<Grid><Button/><!-- <Border/> --><TextBlock/></Grid>";
    let mut parser = XmlParser::parse(text, 9);
    let sibling = parser.seek_next_sibling_start_tag().unwrap();
    assert!(text[sibling..].starts_with("<TextBlock"));
}

#[test]
fn test_seek_next_sibling_at_text_end() {
    let text = "<Grid><Button";
    let mut parser = XmlParser::parse(text, text.len());
    assert_eq!(parser.seek_next_sibling_start_tag(), None);
}

// =============================================================================
// ROBUSTNESS
// =============================================================================

#[test]
fn test_every_offset_is_safe() {
    let text = format!("{WINDOW}<Ünïcødé Attr=\"ß\" <!-- <![CDATA[ ]]> />");
    for offset in 0..=text.len() + 3 {
        let mut parser = XmlParser::parse(&text, offset);
        let _ = parser.tag_name();
        let _ = parser.attribute_name();
        let _ = parser.attribute_value();
        for level in 0..4 {
            let _ = parser.enclosing_tag_name(level);
        }
        let _ = parser.find_ancestor_attribute_value("x:Class", 10);
        let _ = parser.seek_next_sibling_start_tag();
    }
}
