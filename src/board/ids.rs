/// Source of fresh, opaque ids for new cards and lists.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs, used by the real application.
#[derive(Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic ids with a prefix (`n1`, `n2`, ...).
#[cfg(test)]
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

#[cfg(test)]
impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), next: 1 }
    }
}

#[cfg(test)]
impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let n = self.next;
        self.next += 1;
        format!("{}{n}", self.prefix)
    }
}
