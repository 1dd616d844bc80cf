//! Page resource dictionary and name binding.
//!
//! Content stream operators refer to shared objects by short names
//! (`/F1 12 Tf`, `/Im1 Do`). [`Resources`] owns one page's resource
//! dictionary and hands out those names:
//!
//! - Fonts: `/F1`, `/F2`, ...
//! - Color spaces: `/cs1`, ...
//! - Extended graphics states: `/gs1`, ...
//! - Shadings: `/sh1`, ...
//! - Patterns: `/p1`, ...
//! - Property lists: `/Prop1`, ...
//! - Image XObjects: `/Im1`, ... and form XObjects: `/Form1`, ... (sharing the XObject category)
//!
//! Binding is idempotent: the same object always gets the same name.

use crate::object::{Dictionary, Object, ObjectRef};
use indexmap::IndexMap;

/// Kind of resource, which decides the category dictionary and name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `/Font`
    Font,
    /// `/ColorSpace`
    ColorSpace,
    /// `/ExtGState`
    ExtGState,
    /// `/Shading`
    Shading,
    /// `/Pattern`
    Pattern,
    /// `/Properties`
    Properties,
    /// Image in `/XObject`
    Image,
    /// Form in `/XObject`
    Form,
}

impl ResourceKind {
    /// Key of the category dictionary inside the resource dictionary.
    pub fn category(&self) -> &'static str {
        match self {
            ResourceKind::Font => "Font",
            ResourceKind::ColorSpace => "ColorSpace",
            ResourceKind::ExtGState => "ExtGState",
            ResourceKind::Shading => "Shading",
            ResourceKind::Pattern => "Pattern",
            ResourceKind::Properties => "Properties",
            ResourceKind::Image | ResourceKind::Form => "XObject",
        }
    }

    /// Prefix of generated names.
    pub fn prefix(&self) -> &'static str {
        match self {
            ResourceKind::Font => "F",
            ResourceKind::ColorSpace => "cs",
            ResourceKind::ExtGState => "gs",
            ResourceKind::Shading => "sh",
            ResourceKind::Pattern => "p",
            ResourceKind::Properties => "Prop",
            ResourceKind::Image => "Im",
            ResourceKind::Form => "Form",
        }
    }
}

/// An object that can be bound into a page's resource dictionary.
///
/// Identity is carried by [`Resource::resource_object`]: indirect objects
/// compare by reference, direct objects by value.
pub trait Resource {
    /// Which category the object belongs to.
    fn kind(&self) -> ResourceKind;

    /// The value stored in the resource dictionary.
    fn resource_object(&self) -> Object;
}

macro_rules! indirect_resource {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            object: Object,
        }

        impl $name {
            /// Wrap an object (usually an [`Object::Reference`]).
            pub fn new(object: Object) -> Self {
                Self { object }
            }

            /// Wrap an indirect object reference.
            pub fn from_ref(object_ref: ObjectRef) -> Self {
                Self::new(Object::Reference(object_ref))
            }

            /// The wrapped object.
            pub fn object(&self) -> &Object {
                &self.object
            }
        }

        impl Resource for $name {
            fn kind(&self) -> ResourceKind {
                $kind
            }

            fn resource_object(&self) -> Object {
                self.object.clone()
            }
        }
    };
}

indirect_resource!(
    /// A form XObject drawn with `Do`.
    FormXObject,
    ResourceKind::Form
);
indirect_resource!(
    /// A shading painted with `sh`.
    Shading,
    ResourceKind::Shading
);
indirect_resource!(
    /// An extended graphics state selected with `gs`.
    ExtGState,
    ResourceKind::ExtGState
);
indirect_resource!(
    /// A marked-content property list referenced from `BDC`.
    PropertyList,
    ResourceKind::Properties
);
indirect_resource!(
    /// A tiling or shading pattern.
    Pattern,
    ResourceKind::Pattern
);

/// One page's resource dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resources {
    categories: IndexMap<String, IndexMap<String, Object>>,
}

impl Resources {
    /// Create an empty resource dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an existing resource dictionary.
    ///
    /// Only dictionary-valued categories are kept; entries keep their
    /// existing names so newly allocated names never collide with them.
    pub fn from_dictionary(dict: &Dictionary) -> Self {
        let mut resources = Self::new();
        for (category, value) in dict {
            if let Object::Dictionary(entries) = value {
                let map = resources.categories.entry(category.clone()).or_default();
                for (name, object) in entries {
                    map.insert(name.clone(), object.clone());
                }
            }
        }
        resources
    }

    /// Bind a resource, returning its name (without the leading slash).
    pub fn add<R: Resource + ?Sized>(&mut self, resource: &R) -> String {
        self.add_object(resource.kind(), resource.resource_object())
    }

    /// Bind a raw object of the given kind, returning its name.
    ///
    /// An object already present in the category keeps its name. Otherwise
    /// the name is the kind's prefix followed by the category size plus one,
    /// incremented until unused.
    pub fn add_object(&mut self, kind: ResourceKind, object: Object) -> String {
        let entries = self.categories.entry(kind.category().to_string()).or_default();

        if let Some((name, _)) = entries.iter().find(|(_, existing)| **existing == object) {
            return name.clone();
        }

        let mut n = entries.len();
        let name = loop {
            n += 1;
            let candidate = format!("{}{}", kind.prefix(), n);
            if !entries.contains_key(&candidate) {
                break candidate;
            }
        };

        log::debug!("Bound {} resource as /{}", kind.category(), name);
        entries.insert(name.clone(), object);
        name
    }

    /// Look up a bound object by category and name.
    pub fn get(&self, kind: ResourceKind, name: &str) -> Option<&Object> {
        self.categories.get(kind.category())?.get(name)
    }

    /// Names bound in a category, in binding order.
    pub fn names(&self, kind: ResourceKind) -> Vec<String> {
        self.categories
            .get(kind.category())
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Whether nothing has been bound.
    pub fn is_empty(&self) -> bool {
        self.categories.values().all(IndexMap::is_empty)
    }

    /// Convert into a PDF dictionary.
    pub fn to_dictionary(&self) -> Dictionary {
        self.categories
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(category, entries)| {
                let dict = entries
                    .iter()
                    .map(|(name, object)| (name.clone(), object.clone()))
                    .collect();
                (category.clone(), Object::Dictionary(dict))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes() {
        assert_eq!(ResourceKind::Font.prefix(), "F");
        assert_eq!(ResourceKind::Image.prefix(), "Im");
        assert_eq!(ResourceKind::Form.prefix(), "Form");
        assert_eq!(ResourceKind::Image.category(), ResourceKind::Form.category());
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut resources = Resources::new();
        let form = FormXObject::from_ref(ObjectRef::new(10, 0));
        let first = resources.add(&form);
        let second = resources.add(&form);
        assert_eq!(first, "Form1");
        assert_eq!(first, second);
        assert_eq!(resources.names(ResourceKind::Form), vec!["Form1"]);
    }

    #[test]
    fn test_distinct_objects_distinct_names() {
        let mut resources = Resources::new();
        let a = resources.add(&Shading::from_ref(ObjectRef::new(1, 0)));
        let b = resources.add(&Shading::from_ref(ObjectRef::new(2, 0)));
        assert_eq!(a, "sh1");
        assert_eq!(b, "sh2");
    }

    #[test]
    fn test_xobject_category_is_shared() {
        let mut resources = Resources::new();
        let form = resources.add(&FormXObject::from_ref(ObjectRef::new(1, 0)));
        let image = resources.add_object(ResourceKind::Image, Object::Reference(ObjectRef::new(2, 0)));
        assert_eq!(form, "Form1");
        assert_eq!(image, "Im2");
        assert_eq!(resources.names(ResourceKind::Image).len(), 2);
    }

    #[test]
    fn test_existing_names_are_skipped() {
        let mut font_dict = Dictionary::new();
        font_dict.insert("F2".to_string(), Object::Reference(ObjectRef::new(3, 0)));
        let mut dict = Dictionary::new();
        dict.insert("Font".to_string(), Object::Dictionary(font_dict));

        let mut resources = Resources::from_dictionary(&dict);
        let name = resources.add_object(ResourceKind::Font, Object::Reference(ObjectRef::new(4, 0)));
        assert_eq!(name, "F3");

        let existing = resources.add_object(ResourceKind::Font, Object::Reference(ObjectRef::new(3, 0)));
        assert_eq!(existing, "F2");
    }

    #[test]
    fn test_to_dictionary() {
        let mut resources = Resources::new();
        assert!(resources.is_empty());
        resources.add(&ExtGState::from_ref(ObjectRef::new(8, 0)));

        let dict = resources.to_dictionary();
        let gs = dict.get("ExtGState").and_then(Object::as_dict).unwrap();
        assert_eq!(gs.get("gs1"), Some(&Object::Reference(ObjectRef::new(8, 0))));
        assert!(!dict.contains_key("Font"));
        assert_eq!(
            resources.get(ResourceKind::ExtGState, "gs1"),
            Some(&Object::Reference(ObjectRef::new(8, 0)))
        );
    }
}
