/// parse document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" which has titles and
/// pairs key-vector of values. User may pass a template HashMap<String, HashMap<String, Option<Vec<Value>>>>: every
/// title and key of the template is present in the result, missing fields are None.
///
/// Values containing spaces or commas (function expressions, for example) are written in double quotes:
/// ```text
/// function
///   f: "x^3 - 2*x"
/// interval
///   a: -1  b: 1
/// ```
/// Lines starting with //, #, % or ; are comments.
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{alpha1, alphanumeric1, char, multispace0, space0},
    combinator::{map, map_res, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::Display;

pub type DocumentMap = HashMap<String, SectionMap>;
pub type SectionMap = HashMap<String, Option<Vec<Value>>>;
/// enum to represent different value types:
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    pub fn as_string(&self) -> Option<&String> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// numeric value; integers are widened to f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }
    // Try to convert to string representation
    pub fn to_string_value(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Float(f) => f.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Boolean(b) => b.to_string(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

/// Parses a title (word characters without spaces)
fn parse_title(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    let mut parser = map(parser, String::from);
    let (input, result) = parser.parse(input)?;
    // Ignore trailing whitespace and newline characters
    let input = input.trim();
    Ok((input, result))
}

/// Parses a key (word characters without spaces)
fn parse_key(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    let mut parser = map(parser, String::from);
    let (input, result) = parser.parse(input)?;
    Ok((input, result))
}

/// "quoted text" is always a string, spaces and commas included
fn parse_quoted(input: &str) -> IResult<&str, Value> {
    let mut parser = map(
        delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        |s: &str| Value::String(s.to_string()),
    );
    parser.parse(input)
}

fn parse_bare_value(input: &str) -> IResult<&str, Value> {
    // Parse a single value - excluding commas, whitespace, newlines, and semicolons
    let value_parser = take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\n' | '\r' | ';' | '"'));
    let mut value_parser = map_res(value_parser, |s: &str| -> Result<Value, String> {
        let s = s.trim();
        // Try parsing as different types in order
        if let Ok(val) = s.parse::<i64>() {
            Ok(Value::Integer(val))
        } else if let Ok(val) = s.parse::<f64>() {
            Ok(Value::Float(val))
        } else if let Ok(val) = s.parse::<bool>() {
            Ok(Value::Boolean(val))
        } else {
            Ok(Value::String(s.to_string()))
        }
    });
    value_parser.parse(input)
}

fn parse_value(input: &str) -> IResult<&str, Value> {
    alt((parse_quoted, parse_bare_value)).parse(input)
}

fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let (input, _) = multispace0(input)?;
    // delimited drops the spaces around each comma
    let separator_coma = delimited(space0, tag(","), space0);
    let mut value_parser = separated_list0(separator_coma, parse_value);
    value_parser.parse(input)
}

/// Parses a key-value pair where value is a list
fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    let mut parser = separated_pair(parse_key, colon_separator, parse_value_list);
    let (input, result) = parser.parse(input)?;
    Ok((input.trim(), result))
}

/// Parses a section with a title and multiple key-value pairs
fn parse_section(input: &str) -> IResult<&str, (String, HashMap<String, Vec<Value>>)> {
    let (input, _) = space0(input)?;
    let (input, title) = parse_title(input)?;
    // spaces and newlines after the title
    let (input, _) = multispace0(input)?;
    let mut parser = many1(terminated(parse_key_value_pair, space0));
    let (input, pairs) = parser.parse(input)?;

    let mut section_map = HashMap::new();
    for (key, values) in pairs {
        section_map.insert(key, values);
    }
    Ok((input, (title, section_map)))
}

/// Filters out comment lines (starting with //, #, %, or ;) and blank lines
fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.starts_with(';')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the entire document into a HashMap
pub fn parse_document(input: &str) -> IResult<&str, DocumentMap> {
    let mut parser = many1(delimited(
        multispace0, // Allow optional whitespace before a section
        parse_section,
        multispace0, // Allow optional whitespace after a section
    ));
    let (input, sections) = parser.parse(input)?;

    let mut result = HashMap::new();
    for (title, section_map) in sections.into_iter() {
        let mut title_map = HashMap::new();
        for (key, values) in section_map {
            title_map.insert(key, Some(values));
        }
        result.insert(title, title_map);
    }
    Ok((input, result))
}

/// Parses a document and merges with a template HashMap, ensuring all expected keys exist
fn parse_document_with_template(input: &str, template: &DocumentMap) -> Result<DocumentMap, String> {
    let mut parsed = parse_complete_document(input)?;
    for (title, keys_map) in template {
        let section_map = parsed.entry(title.clone()).or_default();
        for key in keys_map.keys() {
            section_map.entry(key.clone()).or_insert(None);
        }
    }
    Ok(parsed)
}

fn parse_complete_document(input: &str) -> Result<DocumentMap, String> {
    match parse_document(input) {
        Ok((remaining, parsed)) => {
            if !remaining.trim().is_empty() {
                return Err(format!(
                    "Failed to parse entire document. Remaining: '{}'",
                    remaining
                ));
            }
            Ok(parsed)
        }
        Err(e) => Err(format!("Parsing error: {:?}", e)),
    }
}

/// Parses a document (comments removed), optionally merging it with a template.
pub fn parse_document_as(input: &str, template: Option<DocumentMap>) -> Result<DocumentMap, String> {
    let filtered = filter_comments(input);
    match template {
        Some(template) => parse_document_with_template(&filtered, &template),
        None => parse_complete_document(&filtered),
    }
}

/// Template with every listed title and key set to None
pub fn template_from(fields: &[(&str, &[&str])]) -> DocumentMap {
    fields
        .iter()
        .map(|(title, keys)| {
            let section = keys.iter().map(|key| (key.to_string(), None)).collect();
            (title.to_string(), section)
        })
        .collect()
}

/////////////////////////////TESTS////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::{Read, Write};
    use tempfile::tempdir;

    #[test]
    fn test_parse_title() {
        let (remaining, title) = parse_title("title1\n key1: value1").unwrap();
        assert_eq!(title, "title1");
        assert_eq!(remaining, "key1: value1");

        let (remaining, title) = parse_title("title_with_underscore key1: value1").unwrap();
        assert_eq!(title, "title_with_underscore");
        assert_eq!(remaining, "key1: value1");
    }

    #[test]
    fn test_parse_key() {
        let (remaining, key) = parse_key("key_with_underscore: value1").unwrap();
        assert_eq!(key, "key_with_underscore");
        assert_eq!(remaining, ": value1");
    }

    #[test]
    fn test_parse_value() {
        let (remaining, value) = parse_value("value1, value2").unwrap();
        assert_eq!(value, Value::String("value1".to_string()));
        assert_eq!(remaining, ", value2");

        let (remaining, value) = parse_value("-123, next").unwrap();
        assert_eq!(value, Value::Integer(-123));
        assert_eq!(remaining, ", next");

        let (_, value) = parse_value("1e-3").unwrap();
        assert_eq!(value, Value::Float(1e-3));

        let (_, value) = parse_value("true, next").unwrap();
        assert_eq!(value, Value::Boolean(true));
    }

    #[test]
    fn test_parse_quoted_value_keeps_spaces_and_commas() {
        let (remaining, value) = parse_value("\"x^3 - 2*x, y\" rest").unwrap();
        assert_eq!(value, Value::String("x^3 - 2*x, y".to_string()));
        assert_eq!(remaining, " rest");
    }

    #[test]
    fn test_parse_value_list() {
        let (remaining, values) = parse_value_list("value1, 123, 45.67, true").unwrap();
        assert_eq!(
            values,
            vec![
                Value::String("value1".to_string()),
                Value::Integer(123),
                Value::Float(45.67),
                Value::Boolean(true)
            ]
        );
        assert_eq!(remaining, "");

        let (remaining, values) = parse_value_list("").unwrap();
        assert_eq!(values, Vec::<Value>::new());
        assert_eq!(remaining, "");
    }

    #[test]
    fn test_parse_key_value_pair() {
        let (remaining, (key, values)) = parse_key_value_pair("line : 1 , 4").unwrap();
        assert_eq!(key, "line");
        assert_eq!(values, vec![Value::Integer(1), Value::Integer(4)]);
        assert_eq!(remaining, "");

        let (remaining, (key, values)) = parse_key_value_pair("key1: value1;").unwrap();
        assert_eq!(key, "key1");
        assert_eq!(values, vec![Value::String("value1".to_string())]);
        assert_eq!(remaining, ";");
    }

    #[test]
    fn test_parse_section_on_one_line() {
        let (remaining, (title, map)) = parse_section("interval a: -1 b: 1").unwrap();
        assert_eq!(title, "interval");
        assert_eq!(map["a"], vec![Value::Integer(-1)]);
        assert_eq!(map["b"], vec![Value::Integer(1)]);
        assert_eq!(remaining, "");
    }

    #[test]
    fn test_parse_document_with_comments() {
        let input = "# revolution task\nfunction\n  f: \"x^2 + 1\"\n// axis\naxis\n  kind: x\n";
        let result = parse_document_as(input, None).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(
            result["function"]["f"],
            Some(vec![Value::String("x^2 + 1".to_string())])
        );
        assert_eq!(
            result["axis"]["kind"],
            Some(vec![Value::String("x".to_string())])
        );
    }

    #[test]
    fn test_parse_document_with_template() {
        let input = "interval\n a: 0\n";
        let template = template_from(&[("interval", &["a", "b"]), ("render", &["output"])]);
        let result = parse_document_as(input, Some(template)).unwrap();
        assert_eq!(result["interval"]["a"], Some(vec![Value::Integer(0)]));
        assert!(result["interval"]["b"].is_none());
        assert!(result["render"]["output"].is_none());
    }

    #[test]
    fn test_parse_document_errors() {
        assert!(parse_document_as("", None).is_err());
        assert!(parse_document_as("title1\n key1: value1, \n invalid structure", None).is_err());
        assert!(parse_document_as("function\n f: \"x^2\n", None).is_err());
    }

    #[test]
    fn test_parse_document_from_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("task.txt");

        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "function").unwrap();
        writeln!(file, "  f: \"abs(x)\"").unwrap();
        writeln!(file, "axis").unwrap();
        writeln!(file, "  line: 1, 4").unwrap();
        writeln!(file, "approximation").unwrap();
        writeln!(file, "  n: 100").unwrap();

        let mut file = File::open(&file_path).unwrap();
        let mut contents = String::new();
        file.read_to_string(&mut contents).unwrap();

        let result = parse_document_as(&contents, None).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(
            result["axis"]["line"],
            Some(vec![Value::Integer(1), Value::Integer(4)])
        );
        assert_eq!(result["approximation"]["n"], Some(vec![Value::Integer(100)]));
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Integer(3).as_float(), Some(3.0));
        assert_eq!(Value::Float(0.5).as_integer(), None);
        assert_eq!(Value::Boolean(false).as_boolean(), Some(false));
        assert_eq!(Value::String("y".to_string()).to_string_value(), "y");
    }
}
