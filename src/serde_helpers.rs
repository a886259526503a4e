//! Serde helpers for shared tree data
//!
//! Bound trees hold their nodes and symbols behind `Arc` and keep children in
//! persistent `rpds` vectors; neither implements Serialize/Deserialize out of
//! the box, so fields use these functions through `serialize_with` /
//! `deserialize_with`.

use std::sync::Arc;

use archery::ArcK;
use rpds::Vector;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialize Arc<T> by serializing the inner value
pub fn serialize_arc<S, T>(arc: &Arc<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    arc.as_ref().serialize(serializer)
}

/// Deserialize Arc<T> by deserializing the inner value and wrapping in Arc
pub fn deserialize_arc<'de, D, T>(deserializer: D) -> Result<Arc<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value = T::deserialize(deserializer)?;
    Ok(Arc::new(value))
}

/// Serialize Vec<Arc<T>> by serializing each inner value
pub fn serialize_arc_vec<S, T>(vec: &Vec<Arc<T>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    let mut seq = serializer.serialize_seq(Some(vec.len()))?;
    for item in vec {
        seq.serialize_element(item.as_ref())?;
    }
    seq.end()
}

/// Deserialize Vec<Arc<T>> by deserializing each value and wrapping in Arc
pub fn deserialize_arc_vec<'de, D, T>(deserializer: D) -> Result<Vec<Arc<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let vec: Vec<T> = Vec::deserialize(deserializer)?;
    Ok(vec.into_iter().map(Arc::new).collect())
}

/// Serialize Option<Arc<T>>
pub fn serialize_option_arc<S, T>(opt: &Option<Arc<T>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    match opt {
        Some(arc) => serializer.serialize_some(arc.as_ref()),
        None => serializer.serialize_none(),
    }
}

/// Deserialize Option<Arc<T>>
pub fn deserialize_option_arc<'de, D, T>(deserializer: D) -> Result<Option<Arc<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt: Option<T> = Option::deserialize(deserializer)?;
    Ok(opt.map(Arc::new))
}

/// Serialize a persistent child vector as a plain sequence
pub fn serialize_arc_vector<S, T>(
    vector: &Vector<Arc<T>, ArcK>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    let mut seq = serializer.serialize_seq(Some(vector.len()))?;
    for item in vector.iter() {
        seq.serialize_element(item.as_ref())?;
    }
    seq.end()
}

/// Deserialize a plain sequence into a persistent child vector
pub fn deserialize_arc_vector<'de, D, T>(
    deserializer: D,
) -> Result<Vector<Arc<T>, ArcK>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let vec: Vec<T> = Vec::deserialize(deserializer)?;
    let mut vector = Vector::<Arc<T>, ArcK>::new_with_ptr_kind();
    for item in vec {
        vector.push_back_mut(Arc::new(item));
    }
    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    struct Holder {
        #[serde(serialize_with = "serialize_arc_vector", deserialize_with = "deserialize_arc_vector")]
        items: Vector<Arc<u32>, ArcK>,
        #[serde(
            default,
            serialize_with = "serialize_option_arc",
            deserialize_with = "deserialize_option_arc"
        )]
        extra: Option<Arc<String>>,
    }

    #[test]
    fn test_vector_preserves_order() {
        let holder: Holder = serde_json::from_str(r#"{"items":[3,1,2]}"#).unwrap();
        let items: Vec<u32> = holder.items.iter().map(|i| **i).collect();
        assert_eq!(items, vec![3, 1, 2]);
        assert!(holder.extra.is_none());
        assert_eq!(serde_json::to_string(&holder).unwrap(), r#"{"items":[3,1,2],"extra":null}"#);
    }
}
