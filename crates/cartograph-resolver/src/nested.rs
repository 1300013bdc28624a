//! Replacing `$ref` slots inside typed objects.

use cartograph_spec::{
    Callback, Components, Encoding, Example, Header, Link, MediaType, OpenApiSpec, Operation,
    Parameter, PathItem, Paths, RefOr, RequestBody, Response, Schema, SecurityScheme,
    SpecObject, Webhooks,
};
use indexmap::IndexMap;

use crate::error::ResolveError;
use crate::resolved::Resolved;
use crate::resolver::Resolver;

/// Objects whose [`RefOr::Ref`] slots can be replaced by their targets.
pub trait ResolveNested {
    fn resolve_nested(&mut self, resolver: &Resolver<'_>) -> Result<(), ResolveError>;
}

impl<T> ResolveNested for RefOr<T>
where
    T: SpecObject + ResolveNested,
{
    fn resolve_nested(&mut self, resolver: &Resolver<'_>) -> Result<(), ResolveError> {
        let reference = match self {
            RefOr::Item(item) => return item.resolve_nested(resolver),
            RefOr::Ref(reference) => reference.clone(),
        };

        if resolver.is_active(&reference) {
            tracing::trace!(reference = %reference.ref_location, "Keeping recursive placeholder");
            return Ok(());
        }
        *self = RefOr::Item(resolver.resolve_as::<T>(reference)?);
        Ok(())
    }
}

impl<T: ResolveNested> ResolveNested for Option<T> {
    fn resolve_nested(&mut self, resolver: &Resolver<'_>) -> Result<(), ResolveError> {
        match self {
            Some(inner) => inner.resolve_nested(resolver),
            None => Ok(()),
        }
    }
}

impl<T: ResolveNested> ResolveNested for Box<T> {
    fn resolve_nested(&mut self, resolver: &Resolver<'_>) -> Result<(), ResolveError> {
        (**self).resolve_nested(resolver)
    }
}

impl<T: ResolveNested> ResolveNested for Vec<T> {
    fn resolve_nested(&mut self, resolver: &Resolver<'_>) -> Result<(), ResolveError> {
        self.iter_mut()
            .try_for_each(|item| item.resolve_nested(resolver))
    }
}

impl<T: ResolveNested> ResolveNested for IndexMap<String, T> {
    fn resolve_nested(&mut self, resolver: &Resolver<'_>) -> Result<(), ResolveError> {
        self.values_mut()
            .try_for_each(|item| item.resolve_nested(resolver))
    }
}

/// Implement [`ResolveNested`] by visiting the listed fields in order.
macro_rules! resolve_fields {
    ($($ty:ty => [$($field:ident),*]);* $(;)?) => {
        $(
            impl ResolveNested for $ty {
                #[allow(unused_variables)]
                fn resolve_nested(&mut self, resolver: &Resolver<'_>) -> Result<(), ResolveError> {
                    $(self.$field.resolve_nested(resolver)?;)*
                    Ok(())
                }
            }
        )*
    };
}

resolve_fields! {
    Schema => [properties, items, all_of, one_of, any_of, not];
    Header => [schema, examples];
    Parameter => [schema, examples];
    MediaType => [schema, examples, encoding];
    Encoding => [headers];
    RequestBody => [content];
    Response => [content, headers, links];
    Operation => [parameters, request_body, responses, callbacks];
    PathItem => [parameters, operations];
    Paths => [items];
    Webhooks => [items];
    Components => [
        schemas, responses, parameters, examples, request_bodies,
        headers, security_schemes, links, callbacks
    ];
    OpenApiSpec => [paths, webhooks, components];
    Example => [];
    Link => [];
    SecurityScheme => [];
}

impl ResolveNested for Callback {
    /// Path items pulled in through a reference are named after the
    /// expression that holds them.
    fn resolve_nested(&mut self, resolver: &Resolver<'_>) -> Result<(), ResolveError> {
        for (expression, slot) in self.expressions.iter_mut() {
            slot.resolve_nested(resolver)?;
            if let RefOr::Item(item) = slot {
                if item.path.is_empty() {
                    item.path.clone_from(expression);
                    for operation in item.operations.values_mut() {
                        operation.path.clone_from(expression);
                    }
                }
            }
        }
        Ok(())
    }
}

impl ResolveNested for Resolved {
    fn resolve_nested(&mut self, resolver: &Resolver<'_>) -> Result<(), ResolveError> {
        match self {
            Resolved::Schema(schema) => schema.resolve_nested(resolver),
            Resolved::Response(response) => response.resolve_nested(resolver),
            Resolved::Parameter(parameter) => parameter.resolve_nested(resolver),
            Resolved::Example(example) => example.resolve_nested(resolver),
            Resolved::RequestBody(body) => body.resolve_nested(resolver),
            Resolved::Header(header) => header.resolve_nested(resolver),
            Resolved::SecurityScheme(scheme) => scheme.resolve_nested(resolver),
            Resolved::Link(link) => link.resolve_nested(resolver),
            Resolved::Callback(callback) => callback.resolve_nested(resolver),
            Resolved::PathItem(item) => item.resolve_nested(resolver),
            Resolved::Raw(_) => Ok(()),
        }
    }
}
