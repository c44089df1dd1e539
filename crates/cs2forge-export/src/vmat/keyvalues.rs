//! KeyValues text blocks
//!
//! The subset of the Source 2 KeyValues text syntax `.vmat` files use:
//! named blocks in braces, one `key "value"` pair per line, tab indentation.
//! Every value is quoted and numbers use fixed precision, so rendering is
//! byte-stable.

use std::fmt::{self, Write as _};

/// A quoted value
#[derive(Debug, Clone, PartialEq)]
pub enum KvValue {
    /// Text, escaped on output
    Str(String),
    /// Integer
    Int(i64),
    /// Boolean written as `1` or `0`
    Bool(bool),
    /// Float with a fixed number of decimals
    Float {
        /// Value
        value: f32,
        /// Decimals written
        precision: usize,
    },
    /// Bracketed vector, e.g. `[0.500 0.500]`
    Vector {
        /// Components
        values: Vec<f32>,
        /// Decimals written per component
        precision: usize,
    },
}

impl KvValue {
    /// Text value
    pub fn str(value: impl Into<String>) -> Self {
        KvValue::Str(value.into())
    }

    /// Float with `precision` decimals
    pub fn float(value: f32, precision: usize) -> Self {
        KvValue::Float { value, precision }
    }

    /// Vector with `precision` decimals per component
    pub fn vector(values: &[f32], precision: usize) -> Self {
        KvValue::Vector {
            values: values.to_vec(),
            precision,
        }
    }
}

impl fmt::Display for KvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KvValue::Str(s) => {
                for c in s.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        c => f.write_char(c)?,
                    }
                }
                Ok(())
            }
            KvValue::Int(i) => write!(f, "{}", i),
            KvValue::Bool(b) => f.write_str(if *b { "1" } else { "0" }),
            KvValue::Float { value, precision } => write!(f, "{:.*}", precision, value),
            KvValue::Vector { values, precision } => {
                f.write_char('[')?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_char(' ')?;
                    }
                    write!(f, "{:.*}", precision, v)?;
                }
                f.write_char(']')
            }
        }
    }
}

/// One line (or nested block) inside a block
#[derive(Debug, Clone, PartialEq)]
pub enum KvEntry {
    /// `key "value"` line
    Pair(String, KvValue),
    /// Nested block
    Block(KvBlock),
    /// Empty separator line
    Blank,
}

/// Named block of entries
#[derive(Debug, Clone, PartialEq)]
pub struct KvBlock {
    /// Block name written above the braces
    pub name: String,
    /// Entries in output order
    pub entries: Vec<KvEntry>,
}

impl KvBlock {
    /// Empty block
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Append a `key "value"` line
    pub fn pair(mut self, key: impl Into<String>, value: KvValue) -> Self {
        self.entries.push(KvEntry::Pair(key.into(), value));
        self
    }

    /// Append an empty line
    pub fn blank(mut self) -> Self {
        self.entries.push(KvEntry::Blank);
        self
    }

    /// Append a nested block
    pub fn block(mut self, block: KvBlock) -> Self {
        self.entries.push(KvEntry::Block(block));
        self
    }

    /// Value of the first pair named `key` at this level
    pub fn get(&self, key: &str) -> Option<&KvValue> {
        self.entries.iter().find_map(|e| match e {
            KvEntry::Pair(k, v) if k == key => Some(v),
            _ => None,
        })
    }

    /// First nested block named `name`
    pub fn child(&self, name: &str) -> Option<&KvBlock> {
        self.entries.iter().find_map(|e| match e {
            KvEntry::Block(b) if b.name == name => Some(b),
            _ => None,
        })
    }

    fn render(&self, depth: usize, out: &mut Vec<String>) {
        let indent = "\t".repeat(depth);
        out.push(format!("{}{}", indent, self.name));
        out.push(format!("{}{{", indent));
        for entry in &self.entries {
            match entry {
                KvEntry::Pair(key, value) => {
                    out.push(format!("{}\t{} \"{}\"", indent, key, value));
                }
                KvEntry::Block(block) => block.render(depth + 1, out),
                KvEntry::Blank => out.push(String::new()),
            }
        }
        out.push(format!("{}}}", indent));
    }
}

/// A whole KeyValues text file: header comments and top-level blocks
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KvDocument {
    /// `// ` lines written before the blocks
    pub comments: Vec<String>,
    /// Top-level blocks
    pub blocks: Vec<KvBlock>,
}

impl fmt::Display for KvDocument {
    /// Lines are `\n`-separated, without a trailing newline
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::new();
        for comment in &self.comments {
            lines.push(format!("// {}", comment));
        }
        for block in &self.blocks {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            block.render(0, &mut lines);
        }
        f.write_str(&lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_formatting() {
        assert_eq!(KvValue::float(1.0, 3).to_string(), "1.000");
        assert_eq!(KvValue::float(0.0, 3).to_string(), "0.000");
        assert_eq!(
            KvValue::vector(&[1.0, 1.0, 1.0, 0.0], 6).to_string(),
            "[1.000000 1.000000 1.000000 0.000000]"
        );
        assert_eq!(KvValue::Bool(true).to_string(), "1");
        assert_eq!(KvValue::Int(0).to_string(), "0");
        assert_eq!(KvValue::str("a\"b").to_string(), "a\\\"b");
    }

    #[test]
    fn test_nested_render() {
        let doc = KvDocument {
            comments: vec!["generated".into()],
            blocks: vec![KvBlock::new("Outer")
                .pair("key", KvValue::str("v"))
                .blank()
                .block(KvBlock::new("Inner").pair("n", KvValue::Int(2)))],
        };
        assert_eq!(
            doc.to_string(),
            "// generated\n\nOuter\n{\n\tkey \"v\"\n\n\tInner\n\t{\n\t\tn \"2\"\n\t}\n}"
        );
    }

    #[test]
    fn test_lookup() {
        let block = KvBlock::new("Layer0")
            .pair("shader", KvValue::str("x.vfx"))
            .block(KvBlock::new("SystemAttributes"));
        assert_eq!(block.get("shader"), Some(&KvValue::str("x.vfx")));
        assert!(block.child("SystemAttributes").is_some());
        assert!(block.get("missing").is_none());
    }
}
