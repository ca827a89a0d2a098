use crate::board::ids::IdGenerator;
use crate::board::storage::{SnapshotStorage, StorageError};
use crate::board::store::BoardStore;

/// Reusable text editing buffer with cursor.
///
/// `cursor` is a **char index** (not byte index), always in `0..=char_count`.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    pub input: String,
    pub cursor: usize,
}

impl TextBuffer {
    pub fn new(input: String) -> Self {
        let cursor = input.chars().count();
        Self { input, cursor }
    }

    /// Convert a char index to a byte index.
    fn byte_offset(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    pub fn insert(&mut self, c: char) {
        let byte_idx = self.byte_offset(self.cursor);
        self.input.insert(byte_idx, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let byte_idx = self.byte_offset(self.cursor - 1);
            self.input.remove(byte_idx);
            self.cursor -= 1;
        }
    }

    pub fn delete_word(&mut self) {
        let byte_pos = self.byte_offset(self.cursor);
        let before = &self.input[..byte_pos];
        let trimmed = before.trim_end();
        let start_byte = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let start_char = self.input[..start_byte].chars().count();
        self.input.drain(start_byte..byte_pos);
        self.cursor = start_char;
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.input.chars().count() {
            self.cursor += 1;
        }
    }

    /// Start of the current line.
    pub fn home(&mut self) {
        let before: Vec<char> = self.input.chars().take(self.cursor).collect();
        self.cursor = before
            .iter()
            .rposition(|&c| c == '\n')
            .map(|i| i + 1)
            .unwrap_or(0);
    }

    /// End of the current line.
    pub fn end(&mut self) {
        let rest = self.input.chars().skip(self.cursor).position(|c| c == '\n');
        self.cursor = match rest {
            Some(n) => self.cursor + n,
            None => self.input.chars().count(),
        };
    }

    /// Text left of the cursor.
    pub fn before_cursor(&self) -> &str {
        &self.input[..self.byte_offset(self.cursor)]
    }
}

/// Which piece of board text a field edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    CardContent { list_id: String, card_id: String },
    ListTitle { list_id: String },
}

/// The store call a finished edit resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    Unchanged,
    UpdateContent { list_id: String, card_id: String, content: String },
    DeleteCard { list_id: String, card_id: String },
    RenameList { list_id: String, title: String },
}

impl Commit {
    /// Run the commit against the store. Returns whether the board changed.
    pub fn apply<S: SnapshotStorage, G: IdGenerator>(&self, store: &mut BoardStore<S, G>) -> Result<bool, StorageError> {
        match self {
            Commit::Unchanged => Ok(false),
            Commit::UpdateContent { list_id, card_id, content } => {
                store.update_card_content(list_id, card_id, content)
            }
            Commit::DeleteCard { list_id, card_id } => store.delete_card(list_id, card_id),
            Commit::RenameList { list_id, title } => store.rename_list(list_id, title),
        }
    }
}

/// A field in the `Editing` state. `Viewing` is the absence of one.
///
/// Leaving the editing state always goes through [`EditableField::commit`]:
/// blur and soft-submit call it directly, cancel restores the original first.
#[derive(Debug, Clone)]
pub struct EditableField {
    kind: FieldKind,
    original: String,
    buf: TextBuffer,
}

impl EditableField {
    /// Enter editing with the field's current value in the buffer.
    pub fn begin(kind: FieldKind, original: impl Into<String>) -> Self {
        let original = original.into();
        Self {
            kind,
            buf: TextBuffer::new(original.clone()),
            original,
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buf
    }

    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buf
    }

    /// Card content spans lines; list titles do not.
    pub fn is_multiline(&self) -> bool {
        matches!(self.kind, FieldKind::CardContent { .. })
    }

    /// Whether this field edits the given card.
    pub fn edits_card(&self, id: &str) -> bool {
        matches!(&self.kind, FieldKind::CardContent { card_id, .. } if card_id == id)
    }

    /// Whether this field edits the given list's title.
    pub fn edits_title(&self, id: &str) -> bool {
        matches!(&self.kind, FieldKind::ListTitle { list_id } if list_id == id)
    }

    /// Plain line break: a newline in multi-line fields. Returns `false` for
    /// single-line fields, where the caller treats it as a soft submit.
    pub fn line_break(&mut self) -> bool {
        if self.is_multiline() {
            self.buf.insert('\n');
            true
        } else {
            false
        }
    }

    /// Blur: decide what the edit amounts to.
    pub fn commit(self) -> Commit {
        let trimmed = self.buf.input.trim();
        match self.kind {
            FieldKind::CardContent { list_id, card_id } => {
                if trimmed.is_empty() {
                    Commit::DeleteCard { list_id, card_id }
                } else if trimmed == self.original {
                    Commit::Unchanged
                } else {
                    Commit::UpdateContent { list_id, card_id, content: trimmed.to_string() }
                }
            }
            FieldKind::ListTitle { list_id } => {
                if trimmed == self.original {
                    Commit::Unchanged
                } else {
                    Commit::RenameList { list_id, title: trimmed.to_string() }
                }
            }
        }
    }

    /// Explicit commit key; identical to blur.
    pub fn soft_submit(self) -> Commit {
        self.commit()
    }

    /// Discard the buffer, restore the original, then blur.
    pub fn cancel(mut self) -> Commit {
        self.buf = TextBuffer::new(self.original.clone());
        self.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ids::SequentialIds;
    use crate::board::storage::MemoryStorage;

    fn content_field(original: &str) -> EditableField {
        EditableField::begin(
            FieldKind::CardContent { list_id: "1".into(), card_id: "2".into() },
            original,
        )
    }

    fn title_field(original: &str) -> EditableField {
        EditableField::begin(FieldKind::ListTitle { list_id: "1".into() }, original)
    }

    fn type_str(field: &mut EditableField, s: &str) {
        for c in s.chars() {
            field.buffer_mut().insert(c);
        }
    }

    // -----------------------------------------------------------------------
    // TextBuffer
    // -----------------------------------------------------------------------

    #[test]
    fn test_buffer_insert_and_backspace_unicode() {
        let mut buf = TextBuffer::new("héllo".into());
        assert_eq!(buf.cursor, 5);
        buf.backspace();
        buf.move_left();
        buf.insert('ü');
        assert_eq!(buf.input, "hélül");
        assert_eq!(buf.cursor, 4);
    }

    #[test]
    fn test_buffer_delete_word() {
        let mut buf = TextBuffer::new("fix the  bug".into());
        buf.delete_word();
        assert_eq!(buf.input, "fix the  ");
        buf.delete_word();
        assert_eq!(buf.input, "fix ");
    }

    #[test]
    fn test_buffer_home_end_are_line_local() {
        let mut buf = TextBuffer::new("ab\ncde".into());
        buf.home();
        assert_eq!(buf.cursor, 3);
        assert_eq!(buf.before_cursor(), "ab\n");
        buf.move_left();
        buf.home();
        assert_eq!(buf.cursor, 0);
        buf.end();
        assert_eq!(buf.cursor, 2);
        assert_eq!(buf.before_cursor(), "ab");
    }

    #[test]
    fn test_before_cursor_is_char_indexed() {
        let mut buf = TextBuffer::new("日本".into());
        buf.move_left();
        assert_eq!(buf.before_cursor(), "日");
    }

    // -----------------------------------------------------------------------
    // Commit semantics
    // -----------------------------------------------------------------------

    #[test]
    fn test_unchanged_commit() {
        let mut field = content_field("Task");
        type_str(&mut field, "  ");
        assert_eq!(field.commit(), Commit::Unchanged);
    }

    #[test]
    fn test_changed_commit_is_trimmed_update() {
        let mut field = content_field("Task");
        type_str(&mut field, " two ");
        assert_eq!(
            field.commit(),
            Commit::UpdateContent { list_id: "1".into(), card_id: "2".into(), content: "Task two".into() }
        );
    }

    #[test]
    fn test_emptied_content_deletes() {
        let mut field = content_field("Task");
        for _ in 0..4 {
            field.buffer_mut().backspace();
        }
        type_str(&mut field, "   ");
        assert_eq!(field.commit(), Commit::DeleteCard { list_id: "1".into(), card_id: "2".into() });
    }

    #[test]
    fn test_new_empty_card_blurred_untouched_is_deleted() {
        let field = content_field("");
        assert_eq!(field.commit(), Commit::DeleteCard { list_id: "1".into(), card_id: "2".into() });
    }

    #[test]
    fn test_cancel_restores_original() {
        let mut field = content_field("Task");
        type_str(&mut field, " edited");
        assert_eq!(field.cancel(), Commit::Unchanged);

        let mut field = title_field("To Do");
        field.buffer_mut().delete_word();
        assert_eq!(field.cancel(), Commit::Unchanged);
    }

    #[test]
    fn test_line_break_in_content_inserts_newline() {
        let mut field = content_field("a");
        assert!(field.line_break());
        type_str(&mut field, "b");
        assert_eq!(field.buffer().input, "a\nb");
        assert_eq!(
            field.soft_submit(),
            Commit::UpdateContent { list_id: "1".into(), card_id: "2".into(), content: "a\nb".into() }
        );
    }

    #[test]
    fn test_line_break_in_title_is_refused() {
        let mut field = title_field("To Do");
        assert!(!field.line_break());
        assert_eq!(field.buffer().input, "To Do");
    }

    #[test]
    fn test_title_rename_trimmed() {
        let mut field = title_field("To Do");
        type_str(&mut field, " now ");
        assert_eq!(
            field.commit(),
            Commit::RenameList { list_id: "1".into(), title: "To Do now".into() }
        );
    }

    #[test]
    fn test_title_with_trailing_space_is_unchanged() {
        let mut field = title_field("To Do");
        type_str(&mut field, "   ");
        assert_eq!(field.commit(), Commit::Unchanged);
    }

    #[test]
    fn test_edits_card_and_title() {
        assert!(content_field("x").edits_card("2"));
        assert!(!content_field("x").edits_card("1"));
        assert!(title_field("x").edits_title("1"));
        assert!(!title_field("x").edits_card("1"));
    }

    // -----------------------------------------------------------------------
    // Commit against the store
    // -----------------------------------------------------------------------

    #[test]
    fn test_unchanged_title_commit_does_not_mutate_store() {
        let mut store = BoardStore::open(MemoryStorage::new(), "k", SequentialIds::new("n"));
        let mut field = title_field("To Do");
        type_str(&mut field, " ");
        let commit = field.commit();
        assert!(!commit.apply(&mut store).unwrap());
        assert_eq!(store.revision(), 0);
        assert_eq!(store.storage().writes, 0);
    }

    #[test]
    fn test_commit_applies_update_and_delete() {
        let mut store = BoardStore::open(MemoryStorage::new(), "k", SequentialIds::new("n"));
        let mut field = content_field("Task 2");
        type_str(&mut field, "!");
        assert!(field.commit().apply(&mut store).unwrap());
        assert_eq!(store.board().card("2").map(|c| c.content.as_str()), Some("Task 2!"));

        let field = content_field("");
        assert!(field.commit().apply(&mut store).unwrap());
        assert!(store.board().card("2").is_none());
    }
}
