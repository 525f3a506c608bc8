/// One typed content block in a report layout. The renderer walks the
/// ordered block list top to bottom and breaks pages as needed.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Document title, large and bold.
    Title(String),
    /// Section heading.
    Heading(String),
    /// Fixed-order key/value rows.
    Table(Vec<(String, String)>),
    /// One body paragraph (narrative segment).
    Paragraph(String),
    /// Small-print footer text.
    Footer(String),
    /// Vertical gap in millimetres.
    Spacer(f32),
}

impl Block {
    pub fn is_paragraph(&self) -> bool {
        matches!(self, Block::Paragraph(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_paragraph_only_for_paragraphs() {
        assert!(Block::Paragraph("text".into()).is_paragraph());
        assert!(!Block::Heading("text".into()).is_paragraph());
        assert!(!Block::Footer("text".into()).is_paragraph());
        assert!(!Block::Spacer(4.0).is_paragraph());
    }
}
