//! Structural cost model used for the engine's space quota.

use hashbrown::HashSet;

use super::Value;

/// Identities of compound values already charged during one measurement.
pub type Visited = HashSet<usize>;

/// Cost of `value` under the structural model.
///
/// Scalars cost 1, strings their character count, blobs their byte length.
/// An array costs its length plus its elements; an object its key count
/// plus each key and value. A compound value already in `visited` costs 0,
/// so structure shared within one measurement is charged once.
pub fn measure(value: &Value<'_>, visited: &mut Visited) -> u64 {
    match value {
        Value::Undefined
        | Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::BigInt(_)
        | Value::Function(_) => 1,
        Value::Str(s) => s.chars().count() as u64,
        Value::Blob(bytes) => bytes.len() as u64,
        Value::Array(items) => {
            if !first_visit(value, visited) {
                return 0;
            }
            items
                .iter()
                .fold(items.len() as u64, |acc, item| {
                    acc.saturating_add(measure(item, visited))
                })
        }
        Value::Object(object) => {
            if !first_visit(value, visited) {
                return 0;
            }
            object.iter().fold(object.len() as u64, |acc, (key, item)| {
                acc.saturating_add(key.chars().count() as u64)
                    .saturating_add(measure(item, visited))
            })
        }
    }
}

fn first_visit(value: &Value<'_>, visited: &mut Visited) -> bool {
    match value.identity() {
        Some(id) => visited.insert(id),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::Object;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    fn cost(value: &Value<'_>) -> u64 {
        measure(value, &mut Visited::new())
    }

    #[test]
    fn test_scalars() {
        assert_eq!(cost(&Value::Undefined), 1);
        assert_eq!(cost(&Value::Null), 1);
        assert_eq!(cost(&Value::Bool(true)), 1);
        assert_eq!(cost(&Value::Number(1e300)), 1);
        assert_eq!(cost(&Value::BigInt(-7)), 1);
    }

    #[test]
    fn test_strings_count_characters() {
        assert_eq!(cost(&Value::str("")), 0);
        assert_eq!(cost(&Value::str("hello")), 5);
        assert_eq!(cost(&Value::str("héllo😀")), 6);
        assert_eq!(cost(&Value::blob(&[1, 2, 3])), 3);
    }

    #[test]
    fn test_array_and_object() {
        let array = Value::array(vec![Value::Number(1.0), Value::str("ab")]);
        assert_eq!(cost(&array), 2 + 1 + 2);

        let mut object = Object::new();
        object.insert(Rc::from("key"), Value::Null);
        object.insert(Rc::from("xy"), array);
        // 2 keys + ("key" 3 + null 1) + ("xy" 2 + array 5)
        assert_eq!(cost(&Value::object(object)), 2 + 4 + 7);
    }

    #[test]
    fn test_shared_structure_charged_once() {
        let inner = Value::array(vec![Value::str("abcdef")]);
        let outer = Value::array(vec![inner.clone(), inner.clone(), inner]);
        // outer: 3 + first inner (1 + 6) + 0 + 0
        assert_eq!(cost(&outer), 10);
    }

    #[test]
    fn test_visited_set_spans_calls() {
        let shared = Value::array(vec![Value::Null]);
        let mut visited = Visited::new();
        assert_eq!(measure(&shared, &mut visited), 2);
        assert_eq!(measure(&shared, &mut visited), 0);
        assert_eq!(measure(&shared, &mut Visited::new()), 2);
    }

    #[test]
    fn test_equal_strings_are_charged_each_time() {
        let s = Value::str("abc");
        let array = Value::array(vec![s.clone(), s]);
        assert_eq!(cost(&array), 2 + 3 + 3);
    }
}
