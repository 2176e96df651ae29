/// Byte buffer the emitters write into, with a grow-on-demand indent cache
/// so indenting never allocates per line.
pub(crate) struct Writer {
    buf: Vec<u8>,
    indent_cache: String,
}

const INDENT_UNIT: &str = "  ";

impl Writer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            indent_cache: INDENT_UNIT.repeat(8),
        }
    }

    pub fn push_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn push_str(&mut self, text: &str) {
        self.buf.extend_from_slice(text.as_bytes());
    }

    pub fn newline(&mut self) {
        self.buf.push(b'\n');
    }

    pub fn push_indent(&mut self, depth: i32) {
        if depth <= 0 {
            return;
        }
        let width = depth as usize * INDENT_UNIT.len();
        while self.indent_cache.len() < width {
            self.indent_cache.push_str(INDENT_UNIT);
        }
        self.buf
            .extend_from_slice(self.indent_cache[..width].as_bytes());
    }

    pub fn last_byte(&self) -> Option<u8> {
        self.buf.last().copied()
    }

    pub fn pop_byte(&mut self) {
        self.buf.pop();
    }

    pub fn finish(self) -> String {
        String::from_utf8(self.buf).expect("emitter output must be valid UTF-8")
    }
}
