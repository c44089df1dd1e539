//! ASCII FBX node writer

use std::fmt::Display;

/// Indented ASCII FBX text builder
#[derive(Debug, Default)]
pub struct FbxWriter {
    out: String,
    depth: usize,
}

impl FbxWriter {
    /// Empty document
    pub fn new() -> Self {
        Self::default()
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push('\t');
        }
    }

    /// `; text` comment line
    pub fn comment(&mut self, text: &str) {
        self.indent();
        self.out.push_str("; ");
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Empty line
    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Open `Name: props {`
    pub fn begin(&mut self, name: &str, props: &str) {
        self.indent();
        if props.is_empty() {
            self.out.push_str(&format!("{}:  {{\n", name));
        } else {
            self.out.push_str(&format!("{}: {} {{\n", name, props));
        }
        self.depth += 1;
    }

    /// Close the innermost node
    pub fn end(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.out.push_str("}\n");
    }

    /// `Name: value` line
    pub fn field(&mut self, name: &str, value: impl Display) {
        self.indent();
        self.out.push_str(&format!("{}: {}\n", name, value));
    }

    /// `Name: "value"` line
    pub fn string_field(&mut self, name: &str, value: &str) {
        self.field(name, quote(value));
    }

    /// `Name: *N { a: v,v,v }` array node
    pub fn array<T: Display>(&mut self, name: &str, values: &[T]) {
        self.begin(name, &format!("*{}", values.len()));
        self.indent();
        self.out.push_str("a: ");
        for (i, v) in values.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.out.push_str(&v.to_string());
        }
        self.out.push('\n');
        self.end();
    }

    /// `P: "name", "type", "label", "flags",values` property line
    pub fn property(&mut self, name: &str, kind: &str, label: &str, flags: &str, values: &[String]) {
        self.indent();
        self.out.push_str(&format!(
            "P: {}, {}, {}, {}",
            quote(name),
            quote(kind),
            quote(label),
            quote(flags)
        ));
        for v in values {
            self.out.push(',');
            self.out.push_str(v);
        }
        self.out.push('\n');
    }

    /// Document text
    pub fn finish(self) -> String {
        self.out
    }
}

/// Quote a string for FBX text, replacing embedded quotes
pub fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "&quot;"))
}
