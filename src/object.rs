//! PDF object types.
//!
//! A deliberately small object model: just enough to describe page
//! contents, resource dictionaries and image XObjects. Indirect references
//! are kept as [`ObjectRef`] values and never resolved here; whoever builds
//! these objects from a parsed document resolves them first.

use bytes::Bytes;
use std::collections::HashMap;

/// Dictionary keyed by name (without the leading slash).
pub type Dictionary = HashMap<String, Object>;

/// PDF object representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Null object
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Real (floating-point) value
    Real(f64),
    /// String (byte array)
    String(Vec<u8>),
    /// Name (starting with /)
    Name(String),
    /// Array of objects
    Array(Vec<Object>),
    /// Dictionary (key-value pairs)
    Dictionary(Dictionary),
    /// Stream (dictionary + data)
    Stream {
        /// Stream dictionary
        dict: Dictionary,
        /// Stream data
        data: Bytes,
    },
    /// Indirect object reference
    Reference(ObjectRef),
}

/// Reference to an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef {
    /// Object number
    pub id: u32,
    /// Generation number
    pub gen: u16,
}

impl ObjectRef {
    /// Create a new object reference.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

impl Object {
    /// Get the type name of this object (without data).
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Null => "Null",
            Object::Boolean(_) => "Boolean",
            Object::Integer(_) => "Integer",
            Object::Real(_) => "Real",
            Object::String(_) => "String",
            Object::Name(_) => "Name",
            Object::Array(_) => "Array",
            Object::Dictionary(_) => "Dictionary",
            Object::Stream { .. } => "Stream",
            Object::Reference(_) => "Reference",
        }
    }

    /// Shorthand for a name object.
    pub fn name(name: impl Into<String>) -> Self {
        Object::Name(name.into())
    }

    /// Try to cast to integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Object::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to cast to a number, accepting both integers and reals.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Object::Integer(i) => Some(*i as f64),
            Object::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Try to cast to name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Object::Name(s) => Some(s),
            _ => None,
        }
    }

    /// Try to cast to dictionary. Works for both Dictionary and Stream objects.
    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Object::Dictionary(d) => Some(d),
            Object::Stream { dict, .. } => Some(dict),
            _ => None,
        }
    }

    /// Try to cast to array.
    pub fn as_array(&self) -> Option<&Vec<Object>> {
        match self {
            Object::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to cast to reference.
    pub fn as_reference(&self) -> Option<ObjectRef> {
        match self {
            Object::Reference(r) => Some(*r),
            _ => None,
        }
    }

    /// Try to cast to boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Object::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to cast to string (bytes).
    pub fn as_string(&self) -> Option<&[u8]> {
        match self {
            Object::String(s) => Some(s),
            _ => None,
        }
    }

    /// Check if object is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }
}

/// A stream object owned outside of [`Object`], used for page contents and images.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfStream {
    /// Stream dictionary
    pub dict: Dictionary,
    /// Raw (still filtered) stream data
    pub data: Bytes,
}

impl PdfStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stream from a dictionary and data.
    pub fn with_data(dict: Dictionary, data: impl Into<Bytes>) -> Self {
        Self {
            dict,
            data: data.into(),
        }
    }

    /// Copy a stream out of an [`Object::Stream`].
    pub fn from_object(object: &Object) -> Option<Self> {
        match object {
            Object::Stream { dict, data } => Some(Self {
                dict: dict.clone(),
                data: data.clone(),
            }),
            _ => None,
        }
    }

    /// Convert into an [`Object::Stream`].
    pub fn into_object(self) -> Object {
        Object::Stream {
            dict: self.dict,
            data: self.data,
        }
    }

    /// Look up a dictionary entry.
    pub fn get(&self, key: &str) -> Option<&Object> {
        self.dict.get(key)
    }

    /// Look up the first present entry among `keys` (e.g. a full name and its abbreviation).
    pub fn get_any(&self, keys: &[&str]) -> Option<&Object> {
        keys.iter().find_map(|key| self.dict.get(*key))
    }

    /// Set a dictionary entry.
    pub fn set(&mut self, key: impl Into<String>, value: Object) {
        self.dict.insert(key.into(), value);
    }

    /// Names of the filters applied to this stream, in decoding order.
    ///
    /// `/Filter` may be a single name or an array of names; anything else
    /// is ignored.
    pub fn filters(&self) -> Vec<String> {
        match self.get_any(&["Filter", "F"]) {
            Some(Object::Name(name)) => vec![name.clone()],
            Some(Object::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_name().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Replace the data, keeping `/Length` in sync.
    pub fn set_data(&mut self, data: impl Into<Bytes>) {
        self.data = data.into();
        self.dict
            .insert("Length".to_string(), Object::Integer(self.data.len() as i64));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_integer() {
        let obj = Object::Integer(42);
        assert_eq!(obj.as_integer(), Some(42));
        assert_eq!(obj.as_number(), Some(42.0));
        assert_eq!(obj.type_name(), "Integer");
    }

    #[test]
    fn test_object_real_number() {
        let obj = Object::Real(0.5);
        assert_eq!(obj.as_integer(), None);
        assert_eq!(obj.as_number(), Some(0.5));
    }

    #[test]
    fn test_object_name() {
        let obj = Object::name("DeviceRGB");
        assert_eq!(obj.as_name(), Some("DeviceRGB"));
        assert!(obj.as_string().is_none());
    }

    #[test]
    fn test_object_ref_display() {
        assert_eq!(ObjectRef::new(12, 0).to_string(), "12 0 R");
    }

    #[test]
    fn test_stream_single_filter() {
        let mut stream = PdfStream::new();
        stream.set("Filter", Object::name("DCTDecode"));
        assert_eq!(stream.filters(), vec!["DCTDecode".to_string()]);
    }

    #[test]
    fn test_stream_filter_array() {
        let mut stream = PdfStream::new();
        stream.set(
            "Filter",
            Object::Array(vec![Object::name("ASCIIHexDecode"), Object::name("FlateDecode")]),
        );
        assert_eq!(stream.filters(), vec!["ASCIIHexDecode", "FlateDecode"]);
    }

    #[test]
    fn test_stream_without_filter() {
        assert!(PdfStream::new().filters().is_empty());
    }

    #[test]
    fn test_set_data_updates_length() {
        let mut stream = PdfStream::new();
        stream.set_data(b"q\n".to_vec());
        assert_eq!(stream.get("Length"), Some(&Object::Integer(2)));
    }

    #[test]
    fn test_stream_object_conversion() {
        let stream = PdfStream::with_data(Dictionary::new(), b"abc".to_vec());
        let object = stream.clone().into_object();
        assert_eq!(object.type_name(), "Stream");
        assert_eq!(PdfStream::from_object(&object), Some(stream));
        assert!(PdfStream::from_object(&Object::Null).is_none());
    }
}
