//! The aggregate model: mutable builder, frozen `SourceModel`, and the
//! derived indexes rule evaluators query.

use indexmap::IndexMap;

use crate::entity::{FieldEntity, MethodEntity, TypeEntity};
use crate::relationship::{Relationship, RelationshipKind};
use crate::STEREOTYPE_ANNOTATIONS;

/// Mutable model under construction. Owned by a single frontend during the
/// build phases; must not be shared.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    types: IndexMap<String, TypeEntity>,
    methods: IndexMap<String, MethodEntity>,
    fields: IndexMap<String, FieldEntity>,
    relationships: Vec<Relationship>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a type. Returns `false` if a type with the same FQN already
    /// existed (the first declaration wins).
    pub fn add_type(&mut self, mut entity: TypeEntity) -> bool {
        if self.types.contains_key(&entity.fqn) {
            return false;
        }
        entity.is_component = entity
            .annotations
            .iter()
            .any(|a| STEREOTYPE_ANNOTATIONS.contains(&a.simple_name.as_str()));
        self.types.insert(entity.fqn.clone(), entity);
        true
    }

    /// Insert a method. Two methods with the same owner and resolved
    /// parameter sequence collapse to one; the first wins.
    pub fn add_method(&mut self, entity: MethodEntity) -> bool {
        if self.methods.contains_key(&entity.fqn) {
            return false;
        }
        self.methods.insert(entity.fqn.clone(), entity);
        true
    }

    pub fn add_field(&mut self, entity: FieldEntity) -> bool {
        if self.fields.contains_key(&entity.fqn) {
            return false;
        }
        self.fields.insert(entity.fqn.clone(), entity);
        true
    }

    pub fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }

    // Lookup used by call extraction, which runs against the half-built
    // model before freeze.

    pub fn get_type(&self, fqn: &str) -> Option<&TypeEntity> {
        self.types.get(fqn)
    }

    pub fn get_field(&self, fqn: &str) -> Option<&FieldEntity> {
        self.fields.get(fqn)
    }

    pub fn has_type(&self, fqn: &str) -> bool {
        self.types.contains_key(fqn)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeEntity> {
        self.types.values()
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodEntity> {
        self.methods.values()
    }

    /// Emit `Contains` relationships for every (type, method) and
    /// (type, field) pair. Called once, after all entities are in.
    pub fn complete_containment(&mut self) {
        let mut edges = Vec::with_capacity(self.methods.len() + self.fields.len());
        for method in self.methods.values() {
            edges.push(Relationship::new(
                method.owner_fqn.clone(),
                method.fqn.clone(),
                RelationshipKind::Contains,
            ));
        }
        for field in self.fields.values() {
            edges.push(Relationship::new(
                field.owner_fqn.clone(),
                field.fqn.clone(),
                RelationshipKind::Contains,
            ));
        }
        self.relationships.extend(edges);
    }

    /// Seal the model: derive indexes, propagate stereotype flags, check
    /// invariants. The builder is consumed; nothing can mutate the result.
    pub fn freeze(mut self) -> SourceModel {
        // Enrichment: methods inherit the owner's component flag.
        let component_types: Vec<String> = self
            .types
            .values()
            .filter(|t| t.is_component)
            .map(|t| t.fqn.clone())
            .collect();
        for method in self.methods.values_mut() {
            method.is_component_member = component_types.contains(&method.owner_fqn);
        }

        let mut types_by_package: IndexMap<String, Vec<String>> = IndexMap::new();
        let mut types_by_annotation: IndexMap<String, Vec<String>> = IndexMap::new();
        for t in self.types.values() {
            types_by_package
                .entry(t.package.clone())
                .or_default()
                .push(t.fqn.clone());
            for a in &t.annotations {
                types_by_annotation
                    .entry(a.simple_name.clone())
                    .or_default()
                    .push(t.fqn.clone());
                if let Some(fqn) = &a.fqn {
                    types_by_annotation
                        .entry(fqn.clone())
                        .or_default()
                        .push(t.fqn.clone());
                }
            }
        }

        let mut methods_by_owner: IndexMap<String, Vec<String>> = IndexMap::new();
        let mut methods_by_annotation: IndexMap<String, Vec<String>> = IndexMap::new();
        for m in self.methods.values() {
            methods_by_owner
                .entry(m.owner_fqn.clone())
                .or_default()
                .push(m.fqn.clone());
            for a in &m.annotations {
                methods_by_annotation
                    .entry(a.simple_name.clone())
                    .or_default()
                    .push(m.fqn.clone());
                if let Some(fqn) = &a.fqn {
                    methods_by_annotation
                        .entry(fqn.clone())
                        .or_default()
                        .push(m.fqn.clone());
                }
            }
        }

        let mut fields_by_annotation: IndexMap<String, Vec<String>> = IndexMap::new();
        for f in self.fields.values() {
            for a in &f.annotations {
                fields_by_annotation
                    .entry(a.simple_name.clone())
                    .or_default()
                    .push(f.fqn.clone());
                if let Some(fqn) = &a.fqn {
                    fields_by_annotation
                        .entry(fqn.clone())
                        .or_default()
                        .push(f.fqn.clone());
                }
            }
        }

        let mut relationships_by_source: IndexMap<String, Vec<usize>> = IndexMap::new();
        let mut relationships_by_target: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (idx, rel) in self.relationships.iter().enumerate() {
            relationships_by_source
                .entry(rel.source.clone())
                .or_default()
                .push(idx);
            relationships_by_target
                .entry(rel.target.clone())
                .or_default()
                .push(idx);
        }

        let model = SourceModel {
            types: self.types,
            methods: self.methods,
            fields: self.fields,
            relationships: self.relationships,
            types_by_package,
            types_by_annotation,
            methods_by_owner,
            methods_by_annotation,
            fields_by_annotation,
            relationships_by_source,
            relationships_by_target,
        };
        model.assert_invariants();
        model
    }
}

/// Frozen, fully indexed repository model. All queries return read-only
/// views; iteration order is deterministic (entity insertion order).
#[derive(Debug)]
pub struct SourceModel {
    types: IndexMap<String, TypeEntity>,
    methods: IndexMap<String, MethodEntity>,
    fields: IndexMap<String, FieldEntity>,
    relationships: Vec<Relationship>,

    types_by_package: IndexMap<String, Vec<String>>,
    types_by_annotation: IndexMap<String, Vec<String>>,
    methods_by_owner: IndexMap<String, Vec<String>>,
    methods_by_annotation: IndexMap<String, Vec<String>>,
    fields_by_annotation: IndexMap<String, Vec<String>>,
    relationships_by_source: IndexMap<String, Vec<usize>>,
    relationships_by_target: IndexMap<String, Vec<usize>>,
}

impl SourceModel {
    pub fn empty() -> Self {
        ModelBuilder::new().freeze()
    }

    pub fn get_type(&self, fqn: &str) -> Option<&TypeEntity> {
        self.types.get(fqn)
    }

    pub fn get_method(&self, fqn: &str) -> Option<&MethodEntity> {
        self.methods.get(fqn)
    }

    pub fn get_field(&self, fqn: &str) -> Option<&FieldEntity> {
        self.fields.get(fqn)
    }

    pub fn contains_method(&self, fqn: &str) -> bool {
        self.methods.contains_key(fqn)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeEntity> {
        self.types.values()
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodEntity> {
        self.methods.values()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldEntity> {
        self.fields.values()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.types_by_package.keys().map(String::as_str)
    }

    pub fn types_in_package(&self, package: &str) -> &[String] {
        self.types_by_package
            .get(package)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn methods_in_type(&self, type_fqn: &str) -> impl Iterator<Item = &MethodEntity> {
        self.methods_by_owner
            .get(type_fqn)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .filter_map(|fqn| self.methods.get(fqn))
    }

    /// Methods carrying an annotation, looked up by simple name or FQN.
    pub fn methods_by_annotation(&self, name: &str) -> impl Iterator<Item = &MethodEntity> {
        self.methods_by_annotation
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .filter_map(|fqn| self.methods.get(fqn))
    }

    pub fn types_by_annotation(&self, name: &str) -> impl Iterator<Item = &TypeEntity> {
        self.types_by_annotation
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .filter_map(|fqn| self.types.get(fqn))
    }

    pub fn fields_by_annotation(&self, name: &str) -> impl Iterator<Item = &FieldEntity> {
        self.fields_by_annotation
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .filter_map(|fqn| self.fields.get(fqn))
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn relationships_of_kind(
        &self,
        kind: RelationshipKind,
    ) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter().filter(move |r| r.kind == kind)
    }

    pub fn relationships_from(&self, source: &str) -> impl Iterator<Item = &Relationship> {
        self.relationships_by_source
            .get(source)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(|&idx| &self.relationships[idx])
    }

    pub fn relationships_to(&self, target: &str) -> impl Iterator<Item = &Relationship> {
        self.relationships_by_target
            .get(target)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(|&idx| &self.relationships[idx])
    }

    /// Field of a type, searching the type itself then its supertypes as far
    /// as they are present in the model.
    pub fn field_in_type_or_supertypes(&self, type_fqn: &str, name: &str) -> Option<&FieldEntity> {
        let mut current = Some(type_fqn.to_owned());
        // Linear supertype walk; cycles in declared supertypes terminate
        // because each hop must resolve to a model type.
        let mut hops = 0;
        while let Some(fqn) = current {
            if hops > 64 {
                break;
            }
            if let Some(field) = self.fields.get(&crate::names::field_fqn(&fqn, name)) {
                return Some(field);
            }
            current = self
                .types
                .get(&fqn)
                .and_then(|t| t.supertypes.first())
                .map(|s| s.base_fqn().to_owned())
                .filter(|s| self.types.contains_key(s));
            hops += 1;
        }
        None
    }
}
