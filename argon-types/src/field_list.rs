//! Positional field storage for list-encoded composite types (performatives,
//! `Header`, `Properties`, `Source`/`Target`).
//!
//! AMQP's composite types are encoded as a `list` whose slots carry field
//! semantics by position rather than by name (per §3/§4.2's field-list
//! note): absent trailing fields are simply absent from the list, and a
//! reader must tolerate a shorter list than it knows fields for. This type
//! is the one place that convention lives, so every performative and
//! section struct can be a thin set of named accessors over it instead of
//! re-deriving null-extension and trailing-trim logic per type.

use argon_codec::Value;

/// A positionally-addressed, null-padded list of fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldList(Vec<Value>);

impl FieldList {
    /// An empty field list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Wraps an already-decoded list of values (e.g. the body of a parsed
    /// described value).
    pub fn from_values(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// The value at `index`, or `Value::Null` if the list doesn't reach
    /// that far. Never fails: a short list is not malformed, per §4.2.
    pub fn get(&self, index: usize) -> Value {
        self.0.get(index).cloned().unwrap_or(Value::Null)
    }

    /// Sets the value at `index`, extending the list with `Value::Null`
    /// if it's currently shorter.
    pub fn set(&mut self, index: usize, value: Value) {
        if self.0.len() <= index {
            self.0.resize(index + 1, Value::Null);
        }
        self.0[index] = value;
    }

    /// The field list with any trailing `Value::Null`s dropped — the form
    /// that's actually written to the wire, per the "shortest prefix"
    /// encoding rule.
    pub fn trimmed(&self) -> Vec<Value> {
        let mut end = self.0.len();
        while end > 0 && self.0[end - 1] == Value::Null {
            end -= 1;
        }
        self.0[..end].to_vec()
    }

    /// A borrowed view of every slot, including trailing nulls.
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_past_end_is_null() {
        let fields = FieldList::new();
        assert_eq!(fields.get(3), Value::Null);
    }

    #[test]
    fn set_extends_with_null() {
        let mut fields = FieldList::new();
        fields.set(2, Value::UInt(7));
        assert_eq!(fields.as_slice(), &[Value::Null, Value::Null, Value::UInt(7)]);
    }

    #[test]
    fn trimmed_drops_trailing_nulls_only() {
        let mut fields = FieldList::new();
        fields.set(0, Value::Bool(true));
        fields.set(3, Value::Null);
        assert_eq!(fields.trimmed(), vec![Value::Bool(true)]);
    }
}
