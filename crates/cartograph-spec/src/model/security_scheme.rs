use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::SpecObject;
use crate::error::ModelError;
use crate::fields::{Fields, RawBuilder};

/// A Security Scheme Object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecurityScheme {
    /// `apiKey`, `http`, `mutualTLS`, `oauth2` or `openIdConnect`.
    pub scheme_type: Option<String>,
    pub description: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub scheme: Option<String>,
    pub bearer_format: Option<String>,
    pub flows: Option<OAuthFlows>,
    pub open_id_connect_url: Option<String>,
    pub extra: Map<String, Value>,
}

impl SpecObject for SecurityScheme {
    const KIND: &'static str = "SecurityScheme";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new(Self::KIND, raw)?;
        Ok(Self {
            scheme_type: fields.string("type"),
            description: fields.string("description"),
            name: fields.string("name"),
            location: fields.string("in"),
            scheme: fields.string("scheme"),
            bearer_format: fields.string("bearerFormat"),
            flows: fields.object("flows")?,
            open_id_connect_url: fields.string("openIdConnectUrl"),
            extra: fields.finish(),
        })
    }

    fn to_raw(&self) -> Value {
        RawBuilder::new()
            .string("type", self.scheme_type.as_ref())
            .string("description", self.description.as_ref())
            .string("name", self.name.as_ref())
            .string("in", self.location.as_ref())
            .string("scheme", self.scheme.as_ref())
            .string("bearerFormat", self.bearer_format.as_ref())
            .object("flows", self.flows.as_ref())
            .string("openIdConnectUrl", self.open_id_connect_url.as_ref())
            .finish(&self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// An OAuth Flows Object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OAuthFlows {
    pub implicit: Option<OAuthFlow>,
    pub password: Option<OAuthFlow>,
    pub client_credentials: Option<OAuthFlow>,
    pub authorization_code: Option<OAuthFlow>,
    pub extra: Map<String, Value>,
}

impl SpecObject for OAuthFlows {
    const KIND: &'static str = "OAuthFlows";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new(Self::KIND, raw)?;
        Ok(Self {
            implicit: fields.object("implicit")?,
            password: fields.object("password")?,
            client_credentials: fields.object("clientCredentials")?,
            authorization_code: fields.object("authorizationCode")?,
            extra: fields.finish(),
        })
    }

    fn to_raw(&self) -> Value {
        RawBuilder::new()
            .object("implicit", self.implicit.as_ref())
            .object("password", self.password.as_ref())
            .object("clientCredentials", self.client_credentials.as_ref())
            .object("authorizationCode", self.authorization_code.as_ref())
            .finish(&self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// An OAuth Flow Object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OAuthFlow {
    pub authorization_url: Option<String>,
    pub token_url: Option<String>,
    pub refresh_url: Option<String>,
    /// Scope name to description. Kept as an option because an empty
    /// `scopes: {}` is common and must survive a round trip.
    pub scopes: Option<IndexMap<String, String>>,
    pub extra: Map<String, Value>,
}

impl SpecObject for OAuthFlow {
    const KIND: &'static str = "OAuthFlow";

    fn from_raw(raw: &Value) -> Result<Self, ModelError> {
        let mut fields = Fields::new(Self::KIND, raw)?;
        Ok(Self {
            authorization_url: fields.string("authorizationUrl"),
            token_url: fields.string("tokenUrl"),
            refresh_url: fields.string("refreshUrl"),
            scopes: fields.string_map("scopes"),
            extra: fields.finish(),
        })
    }

    fn to_raw(&self) -> Value {
        RawBuilder::new()
            .string("authorizationUrl", self.authorization_url.as_ref())
            .string("tokenUrl", self.token_url.as_ref())
            .string("refreshUrl", self.refresh_url.as_ref())
            .string_map("scopes", self.scopes.as_ref())
            .finish(&self.extra)
    }

    fn additional_fields(&self) -> &Map<String, Value> {
        &self.extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parse_oauth2_scheme() {
        let raw = json!({
            "type": "oauth2",
            "flows": {
                "authorizationCode": {
                    "authorizationUrl": "https://auth.example.com/authorize",
                    "tokenUrl": "https://auth.example.com/token",
                    "scopes": {"read:pets": "read your pets", "write:pets": "modify pets"}
                },
                "clientCredentials": {
                    "tokenUrl": "https://auth.example.com/token",
                    "scopes": {}
                }
            }
        });
        let scheme = SecurityScheme::from_raw(&raw).unwrap();
        assert_eq!(scheme.scheme_type.as_deref(), Some("oauth2"));

        let flows = scheme.flows.as_ref().unwrap();
        let code = flows.authorization_code.as_ref().unwrap();
        assert_eq!(code.scopes.as_ref().map(IndexMap::len), Some(2));
        let client = flows.client_credentials.as_ref().unwrap();
        assert_eq!(client.scopes, Some(IndexMap::new()));

        assert_eq!(scheme.to_raw(), raw);
    }

    #[test]
    fn parse_api_key_scheme() {
        let raw = json!({"type": "apiKey", "name": "X-API-Key", "in": "header"});
        let scheme = SecurityScheme::from_raw(&raw).unwrap();
        assert_eq!(scheme.location.as_deref(), Some("header"));
        assert_eq!(scheme.name.as_deref(), Some("X-API-Key"));
        assert!(scheme.flows.is_none());
        assert_eq!(scheme.to_raw(), raw);
    }
}
