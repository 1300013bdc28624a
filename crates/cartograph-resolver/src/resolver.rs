//! Local `$ref` resolution.
//!
//! A [`Resolver`] borrows a document tree and walks it along a reference's
//! JSON Pointer. The references currently being resolved sit on a
//! resolution stack; meeting one of them again is a cycle. Every entry is
//! popped by a guard, so the stack is empty again whenever a top-level call
//! returns, whether it succeeded or not.

use std::cell::RefCell;
use std::collections::HashSet;

use cartograph_spec::reference::pointer_from_parts;
use cartograph_spec::{
    Callback, Example, Header, Link, OpenApiSpec, Parameter, PathItem, Reference, RequestBody,
    Response, Schema, SecurityScheme, SpecObject, REF_KEY,
};
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::ResolveError;
use crate::nested::ResolveNested;
use crate::resolved::Resolved;

/// Resolves local references against one document tree.
///
/// Not `Sync`: the resolution stack belongs to one caller at a time. Use one
/// resolver per thread; they are cheap.
#[derive(Debug)]
pub struct Resolver<'a> {
    root: &'a Value,
    stack: RefCell<Vec<String>>,
}

/// Pops the resolution stack when dropped.
struct StackFrame<'r> {
    stack: &'r RefCell<Vec<String>>,
}

impl Drop for StackFrame<'_> {
    fn drop(&mut self) {
        self.stack.borrow_mut().pop();
    }
}

impl<'a> Resolver<'a> {
    /// A resolver over the spec's own tree.
    pub fn new(spec: &'a OpenApiSpec) -> Self {
        Self::for_tree(&spec.raw)
    }

    /// A resolver over any document tree.
    pub fn for_tree(root: &'a Value) -> Self {
        Self {
            root,
            stack: RefCell::new(Vec::new()),
        }
    }

    pub fn root(&self) -> &'a Value {
        self.root
    }

    /// Number of references currently being resolved. Zero between calls.
    pub fn depth(&self) -> usize {
        self.stack.borrow().len()
    }

    /// Resolve a reference to its target.
    ///
    /// With `follow_nested`, a target that is itself a `$ref` node is
    /// followed until a concrete object is reached, and `$ref` slots inside a
    /// typed target are replaced by their targets (see
    /// [`Resolver::resolve_nested_into`]). Without it, the immediate target
    /// is returned, a `$ref` node untouched.
    ///
    /// External references always fail with
    /// [`ResolveError::UnsupportedExternal`].
    pub fn resolve(
        &self,
        reference: impl Into<Reference>,
        follow_nested: bool,
    ) -> Result<Resolved, ResolveError> {
        let reference = reference.into();
        let _frame = self.enter(&reference)?;
        let target = self.locate(&reference)?;

        if Reference::is_reference(target) {
            if follow_nested {
                let next = chained(&reference, target)?;
                tracing::debug!(
                    from = %reference.ref_location,
                    to = %next.ref_location,
                    "Following reference chain"
                );
                return self.resolve(next, true);
            }
            return Ok(Resolved::Raw(target.clone()));
        }

        let mut resolved = convert(&reference, target)?;
        if follow_nested {
            resolved.resolve_nested(self)?;
        }
        tracing::debug!(
            reference = %reference.ref_location,
            kind = resolved.kind(),
            depth = self.depth(),
            "Reference resolved"
        );
        Ok(resolved)
    }

    /// Resolve a reference into a type chosen by the caller, following
    /// chains and resolving nested slots.
    ///
    /// Unlike [`Resolver::resolve`], the target's location does not matter:
    /// `resolve_as::<Schema>("#/definitions/Pet")` works.
    pub fn resolve_as<T>(&self, reference: impl Into<Reference>) -> Result<T, ResolveError>
    where
        T: SpecObject + ResolveNested,
    {
        let reference = reference.into();
        let _frame = self.enter(&reference)?;
        let target = self.locate(&reference)?;

        if Reference::is_reference(target) {
            let next = chained(&reference, target)?;
            return self.resolve_as(next);
        }

        let mut object = T::from_raw(target)?;
        object.resolve_nested(self)?;
        Ok(object)
    }

    /// Replace every `$ref` slot inside `object` with its typed target.
    ///
    /// A slot whose reference leads back to one already being resolved keeps
    /// its placeholder, so recursive schemas resolve to a finite tree. Any
    /// other failure is returned.
    pub fn resolve_nested_into<T>(&self, object: &mut T) -> Result<(), ResolveError>
    where
        T: ResolveNested + ?Sized,
    {
        object.resolve_nested(self)
    }

    /// Walk the tree along a local reference's pointer and return the raw
    /// node it lands on. An empty pointer (`#`) is the root.
    pub fn resolve_local(&self, reference: &Reference) -> Result<&'a Value, ResolveError> {
        if !reference.is_local() {
            return Err(ResolveError::InvalidReference {
                reference: reference.ref_location.clone(),
                reason: "expected local reference".into(),
            });
        }

        let parts = reference.pointer_parts();
        let mut current = self.root;
        for (depth, segment) in parts.iter().enumerate() {
            let traversed = || pointer_from_parts(&parts[..=depth]);
            current = match current {
                Value::Object(map) => {
                    map.get(segment)
                        .ok_or_else(|| ResolveError::PathNotFound {
                            reference: reference.ref_location.clone(),
                            traversed: traversed(),
                        })?
                }
                Value::Array(items) => array_index(segment)
                    .and_then(|index| items.get(index))
                    .ok_or_else(|| ResolveError::InvalidArrayIndex {
                        reference: reference.ref_location.clone(),
                        traversed: traversed(),
                    })?,
                _ => {
                    return Err(ResolveError::CannotNavigate {
                        reference: reference.ref_location.clone(),
                        traversed: traversed(),
                    })
                }
            };
            tracing::trace!(reference = %reference.ref_location, segment = %segment, depth, "Walked pointer segment");
        }
        Ok(current)
    }

    /// Every `$ref` under `node` (the whole document when `None`), one entry
    /// per occurrence, in document order.
    ///
    /// The same reference string used in two places appears twice. Nodes
    /// whose `$ref` is not a string are skipped.
    pub fn get_all_references(&self, node: Option<&Value>) -> Vec<Reference> {
        let mut found = Vec::new();
        let mut visited = HashSet::new();
        collect_references(node.unwrap_or(self.root), &mut visited, &mut found);
        found
    }

    /// Like [`Resolver::get_all_references`], keyed by reference string and
    /// keeping the first occurrence of each.
    pub fn get_unique_references(&self, node: Option<&Value>) -> IndexMap<String, Reference> {
        let mut unique = IndexMap::new();
        for reference in self.get_all_references(node) {
            unique
                .entry(reference.ref_location.clone())
                .or_insert(reference);
        }
        unique
    }

    /// Whether fully resolving `reference` runs into a reference cycle.
    ///
    /// Only [`ResolveError::Circular`] means `true`; every other failure is
    /// returned as an error.
    pub fn is_circular(&self, reference: impl Into<Reference>) -> Result<bool, ResolveError> {
        match self.resolve(reference, true) {
            Ok(_) => Ok(false),
            Err(ResolveError::Circular { chain }) => {
                tracing::debug!(chain = %chain, "Circular reference");
                Ok(true)
            }
            Err(err) => Err(err),
        }
    }

    fn enter(&self, reference: &Reference) -> Result<StackFrame<'_>, ResolveError> {
        if self.is_active(reference) {
            let stack = self.stack.borrow();
            let chain = stack
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(reference.ref_location.as_str()))
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(ResolveError::Circular { chain });
        }
        self.stack.borrow_mut().push(reference.ref_location.clone());
        Ok(StackFrame { stack: &self.stack })
    }

    /// Whether `reference` is already being resolved further up the stack.
    pub(crate) fn is_active(&self, reference: &Reference) -> bool {
        self.stack
            .borrow()
            .iter()
            .any(|active| *active == reference.ref_location)
    }

    fn locate(&self, reference: &Reference) -> Result<&'a Value, ResolveError> {
        if reference.is_external() {
            return Err(ResolveError::UnsupportedExternal(
                reference.ref_location.clone(),
            ));
        }
        self.resolve_local(reference)
    }
}

/// The reference held by a `$ref` node found while resolving `from`.
fn chained(from: &Reference, node: &Value) -> Result<Reference, ResolveError> {
    Reference::from_raw(node).map_err(|e| ResolveError::InvalidReference {
        reference: from.ref_location.clone(),
        reason: format!("target is a malformed reference: {}", e),
    })
}

/// RFC 6901 array index: decimal digits only.
fn array_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Type a raw target by where it sits in the document.
///
/// `components/<kind>/<name>` and `paths/<path>` are typed, as is anything
/// below them. A failed conversion at the exact component or path depth is
/// an error; below it the target is returned raw.
fn convert(reference: &Reference, target: &Value) -> Result<Resolved, ResolveError> {
    if !target.is_object() || Reference::is_reference(target) {
        return Ok(Resolved::Raw(target.clone()));
    }

    let parts = reference.pointer_parts();
    let (typed, exact) = match parts.as_slice() {
        [section, kind, _name, rest @ ..] if section == "components" => {
            let typed = match kind.as_str() {
                "schemas" => Schema::from_raw(target).map(Resolved::Schema),
                "responses" => Response::from_raw(target).map(Resolved::Response),
                "parameters" => Parameter::from_raw(target).map(Resolved::Parameter),
                "examples" => Example::from_raw(target).map(Resolved::Example),
                "requestBodies" => RequestBody::from_raw(target).map(Resolved::RequestBody),
                "headers" => Header::from_raw(target).map(Resolved::Header),
                "securitySchemes" => {
                    SecurityScheme::from_raw(target).map(Resolved::SecurityScheme)
                }
                "links" => Link::from_raw(target).map(Resolved::Link),
                "callbacks" => Callback::from_raw(target).map(Resolved::Callback),
                _ => return Ok(Resolved::Raw(target.clone())),
            };
            (typed, rest.is_empty())
        }
        [section, rest @ ..] if section == "paths" && !rest.is_empty() => {
            let joined = rest.join("/");
            let path = if joined.starts_with('/') {
                joined
            } else {
                format!("/{}", joined)
            };
            (
                PathItem::from_raw_at(&path, target).map(Resolved::PathItem),
                rest.len() == 1,
            )
        }
        _ => return Ok(Resolved::Raw(target.clone())),
    };

    match typed {
        Ok(resolved) => Ok(resolved),
        Err(err) if !exact => {
            tracing::debug!(
                reference = %reference.ref_location,
                error = %err,
                "Target does not fit its inferred type, returning it raw"
            );
            Ok(Resolved::Raw(target.clone()))
        }
        Err(err) => Err(err.into()),
    }
}

fn collect_references(
    node: &Value,
    visited: &mut HashSet<*const Value>,
    found: &mut Vec<Reference>,
) {
    if !visited.insert(node as *const Value) {
        return;
    }
    match node {
        Value::Object(map) => {
            if map.contains_key(REF_KEY) {
                match Reference::from_raw(node) {
                    Ok(reference) => found.push(reference),
                    Err(err) => tracing::debug!(error = %err, "Skipping malformed $ref"),
                }
            }
            for child in map.values() {
                collect_references(child, visited, found);
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_references(child, visited, found);
            }
        }
        _ => {}
    }
}
