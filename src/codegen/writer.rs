//! Line-oriented output buffer with tab indentation.

#[derive(Debug, Clone, Default)]
pub struct CodeWriter {
    buffer: String,
    indent: usize,
    column: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn unindent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    pub fn indent_level(&self) -> usize {
        self.indent
    }

    /// Writes `code` without a line break. Indentation is inserted when the
    /// current line is still empty.
    pub fn write(&mut self, code: &str) {
        if code.is_empty() {
            return;
        }
        if self.column == 0 {
            for _ in 0..self.indent {
                self.buffer.push('\t');
            }
        }
        self.buffer.push_str(code);
        self.column += code.len();
    }

    /// Writes `code` and ends the line. Multi-line input is split and each
    /// line trimmed and written on its own.
    pub fn write_ln(&mut self, code: &str) {
        if code.contains('\n') {
            self.fix_write(code);
            return;
        }
        self.write(code);
        self.buffer.push('\n');
        self.column = 0;
    }

    fn fix_write(&mut self, code: &str) {
        let lines: Vec<&str> = code.split('\n').map(str::trim).collect();
        let first = lines.iter().position(|l| !l.is_empty());
        let last = lines.iter().rposition(|l| !l.is_empty());
        let (Some(first), Some(last)) = (first, last) else {
            self.write_ln("");
            return;
        };
        for line in &lines[first..=last] {
            self.write_ln(line);
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.column = 0;
        self.indent = 0;
    }
}
