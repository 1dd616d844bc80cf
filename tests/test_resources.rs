//! Integration tests for resource name binding.

use pdf_scribe::color::ColorSpace;
use pdf_scribe::fonts::{Font, FontEncoding};
use pdf_scribe::object::{Dictionary, Object, ObjectRef};
use pdf_scribe::writer::{
    ExtGState, FormXObject, Pattern, PropertyList, Resource, ResourceKind, Resources, Shading,
};

fn font(id: u32) -> Font {
    Font::new(ObjectRef::new(id, 0), "Times-Roman", FontEncoding::WinAnsi)
}

#[test]
fn test_prefix_per_category() {
    let mut resources = Resources::new();

    assert_eq!(resources.add(&font(1)), "F1");
    assert_eq!(resources.add(&ColorSpace::DeviceCmyk), "cs1");
    assert_eq!(resources.add(&ExtGState::from_ref(ObjectRef::new(2, 0))), "gs1");
    assert_eq!(resources.add(&Shading::from_ref(ObjectRef::new(3, 0))), "sh1");
    assert_eq!(resources.add(&Pattern::from_ref(ObjectRef::new(4, 0))), "p1");
    assert_eq!(resources.add(&PropertyList::from_ref(ObjectRef::new(5, 0))), "Prop1");
    assert_eq!(resources.add(&FormXObject::from_ref(ObjectRef::new(6, 0))), "Form1");
}

#[test]
fn test_same_object_same_name() {
    let mut resources = Resources::new();
    let names: Vec<String> = (0..5).map(|_| resources.add(&font(9))).collect();
    assert!(names.iter().all(|n| n == "F1"));
    assert_eq!(resources.names(ResourceKind::Font).len(), 1);
}

#[test]
fn test_distinct_objects_distinct_names() {
    let mut resources = Resources::new();
    let names: Vec<String> = (1..=3).map(|id| resources.add(&font(id))).collect();
    assert_eq!(names, vec!["F1", "F2", "F3"]);
}

#[test]
fn test_direct_objects_compare_by_value() {
    let mut resources = Resources::new();
    let indexed = ColorSpace::Indexed {
        base: Box::new(ColorSpace::DeviceRgb),
        hival: 1,
        lookup: vec![0, 0, 0, 255, 255, 255],
    };

    let first = resources.add(&indexed);
    let again = resources.add(&indexed.clone());
    let other = resources.add(&ColorSpace::DeviceCmyk);
    assert_eq!(first, again);
    assert_ne!(first, other);
    assert_eq!(
        resources.get(ResourceKind::ColorSpace, &first),
        Some(&indexed.resource_object())
    );
}

#[test]
fn test_loaded_names_are_not_reused() {
    let mut xobjects = Dictionary::new();
    xobjects.insert("Im1".to_string(), Object::Reference(ObjectRef::new(40, 0)));
    xobjects.insert("Im2".to_string(), Object::Reference(ObjectRef::new(41, 0)));
    let mut dict = Dictionary::new();
    dict.insert("XObject".to_string(), Object::Dictionary(xobjects));
    dict.insert("ProcSet".to_string(), Object::Array(vec![Object::name("PDF")]));

    let mut resources = Resources::from_dictionary(&dict);
    assert_eq!(resources.names(ResourceKind::Image).len(), 2);

    let form = resources.add(&FormXObject::from_ref(ObjectRef::new(50, 0)));
    assert_eq!(form, "Form3");
    let image = resources.add_object(ResourceKind::Image, Object::Reference(ObjectRef::new(51, 0)));
    assert_eq!(image, "Im4");

    let known = resources.add_object(ResourceKind::Image, Object::Reference(ObjectRef::new(41, 0)));
    assert_eq!(known, "Im2");
}

#[test]
fn test_dictionary_output() {
    let mut resources = Resources::new();
    resources.add(&font(1));
    resources.add(&FormXObject::from_ref(ObjectRef::new(2, 0)));

    let dict = resources.to_dictionary();
    let fonts = dict.get("Font").and_then(Object::as_dict).unwrap();
    let xobjects = dict.get("XObject").and_then(Object::as_dict).unwrap();
    assert_eq!(fonts.get("F1"), Some(&Object::Reference(ObjectRef::new(1, 0))));
    assert_eq!(xobjects.get("Form1"), Some(&Object::Reference(ObjectRef::new(2, 0))));
    assert_eq!(dict.len(), 2);

    let reloaded = Resources::from_dictionary(&dict);
    assert_eq!(reloaded.names(ResourceKind::Font), vec!["F1"]);
}
