const INDENT: &str = "    ";

/// Line-oriented text buffer with KCL's four-space indentation.
#[derive(Debug, Default)]
pub(crate) struct KclWriter {
  out: String,
  depth: usize,
}

impl KclWriter {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn line(&mut self, text: impl AsRef<str>) {
    let text = text.as_ref();
    if text.is_empty() {
      self.out.push('\n');
      return;
    }
    for _ in 0..self.depth {
      self.out.push_str(INDENT);
    }
    self.out.push_str(text);
    self.out.push('\n');
  }

  pub(crate) fn blank(&mut self) {
    if !self.out.is_empty() && !self.out.ends_with("\n\n") {
      self.out.push('\n');
    }
  }

  pub(crate) fn indented(&mut self, body: impl FnOnce(&mut Self)) {
    self.depth += 1;
    body(self);
    self.depth -= 1;
  }

  pub(crate) fn finish(self) -> String {
    let mut out = self.out;
    while out.ends_with("\n\n") {
      out.pop();
    }
    out
  }
}
