//! Change detection for trigger values

/// Remembers the last seen value of an equatable trigger
#[derive(Clone, Debug, PartialEq)]
pub struct Trigger<T> {
    value: T,
}

impl<T: PartialEq> Trigger<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Store `value`, returning true when it differs from the previous one
    pub fn update(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        true
    }
}
