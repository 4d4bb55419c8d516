// services/tenant_resolver.rs
//
// Tenant resolution order: ?tenant= query param, X-Tenant-ID header, host
// subdomain, configured default. Never fails.

use rocket::request::{FromRequest, Outcome, Request};

pub const TENANT_HEADER: &str = "X-Tenant-ID";

pub fn resolve_tenant(
    query: Option<&str>,
    header: Option<&str>,
    host: Option<&str>,
    default: &str,
) -> String {
    if let Some(tenant) = query {
        if !tenant.is_empty() {
            return tenant.to_string();
        }
    }

    if let Some(tenant) = header {
        if !tenant.is_empty() {
            return tenant.to_string();
        }
    }

    if let Some(host) = host {
        let parts: Vec<&str> = host.split('.').collect();
        if parts.len() >= 2 {
            let subdomain = parts[0];
            // "localhost", "www" and single-letter labels are not tenants.
            if subdomain != "localhost" && subdomain != "www" && subdomain.len() > 1 {
                return subdomain.to_string();
            }
        }
    }

    default.to_string()
}

// Request guard handing the resolved tenant slug to public handlers.
pub struct Tenant(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Tenant {
    type Error = std::convert::Infallible;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let default = request
            .rocket()
            .state::<crate::AppConfig>()
            .map(|config| config.default_tenant.clone())
            .unwrap_or_else(|| "demo-salon".to_string());

        let query = request
            .query_value::<String>("tenant")
            .and_then(Result::ok);
        let header = request.headers().get_one(TENANT_HEADER);
        let host = request.host().map(|h| h.domain().as_str().to_string());

        Outcome::Success(Tenant(resolve_tenant(
            query.as_deref(),
            header,
            host.as_deref(),
            &default,
        )))
    }
}
