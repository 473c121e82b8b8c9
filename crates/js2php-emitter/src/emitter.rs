//! The output buffer.
//!
//! Layout fidelity lives here: a line counter kept in sync with source line
//! numbers (never rewound), tab indentation with an adjustment for the
//! trailing tab `nl` just wrote, idempotent statement terminators, and an
//! insertion-point stack that lets the function emitter patch a capture
//! clause or `global` bindings into text that was already written.

pub struct Emitter {
    buf: String,
    line: u32,
    indent: usize,
    insertion_points: Vec<usize>,
}

impl Emitter {
    pub fn new() -> Self {
        Emitter {
            buf: String::new(),
            line: 1,
            indent: 0,
            insertion_points: Vec::new(),
        }
    }

    pub fn emit(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    /// Current source line the buffer is synced to.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Ends the current output line: trailing blanks are trimmed, and the
    /// next line starts pre-indented.
    pub fn nl(&mut self) {
        let trimmed = self.buf.trim_end_matches([' ', '\t']).len();
        self.buf.truncate(trimmed);
        self.buf.push('\n');
        for _ in 0..self.indent {
            self.buf.push('\t');
        }
        self.line += 1;
    }

    /// Emits one newline per line the node skipped ahead of the buffer,
    /// which is what preserves the source's blank lines. Never rewinds.
    pub fn sync_to_line(&mut self, target: u32) {
        while target > self.line {
            self.nl();
        }
    }

    pub fn ensure_nl(&mut self) {
        if !self.buf.trim_end_matches([' ', '\t']).ends_with('\n') {
            self.nl();
        }
    }

    pub fn incr_indent(&mut self) {
        self.indent += 1;
        // An `nl` may already have laid down this line's indentation.
        if self.buf.ends_with('\t') {
            self.buf.push('\t');
        }
    }

    pub fn decr_indent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        if self.buf.ends_with('\t') {
            self.buf.pop();
        }
    }

    /// True when the last emitted statement already ended with `;`,
    /// looking through one newline and trailing spaces.
    pub fn is_semi_last(&self) -> bool {
        let mut rest = self.buf.trim_end_matches(' ');
        if let Some(stripped) = rest.strip_suffix('\n') {
            rest = stripped;
        }
        rest.ends_with(';')
    }

    pub fn ensure_semi(&mut self) {
        if !self.is_semi_last() {
            self.buf.push(';');
        }
    }

    /// Turns the trailing `;` into `, `; used when a declaration list sits
    /// in a `for` head.
    pub fn replace_semi_with_comma(&mut self) {
        let end = self.buf.trim_end_matches([' ', '\t']).len();
        if end > 0 && self.buf.as_bytes()[end - 1] == b';' {
            self.buf.replace_range(end - 1..end, ", ");
        }
    }

    // === Insertion points ===
    //
    // A point marks the current buffer offset; `insert_at` splices text at
    // a point counted from the top of the stack and shifts every later
    // point so nesting stays coherent.

    pub fn push_insertion_point(&mut self) {
        self.insertion_points.push(self.buf.len());
    }

    pub fn pop_insertion_point(&mut self) {
        self.insertion_points.pop();
    }

    pub fn insert_at(&mut self, depth: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let Some(idx) = self.insertion_points.len().checked_sub(depth + 1) else {
            return;
        };
        let at = self.insertion_points[idx];
        self.buf.insert_str(at, text);
        for point in &mut self.insertion_points[idx + 1..] {
            *point += text.len();
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}
