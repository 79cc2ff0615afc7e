//! HTTP handlers for Products API

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{InternalServerErrorResponse, InvalidJsonResponse},
    Envelope, JsonBody,
};
#[allow(unused_imports)]
use serde_json::json;
use std::sync::Arc;
use utoipa::{OpenApi, ToResponse};

use crate::error::{NotFoundBody, ProductResult};
use crate::models::{CreateProduct, Product, ReplaceProduct};
use crate::repository::ProductRepository;
use crate::rules;
use crate::service::ProductService;
use crate::validation::{FieldError, Location, ValidationErrors};

pub const DELETED_MESSAGE: &str = "Producto Eliminado";

#[derive(ToResponse)]
#[response(
    description = "Bad Request - One entry per failed rule",
    content_type = "application/json",
    example = json!({
        "errors": [{
            "type": "field",
            "value": "not-valid-url",
            "msg": "Id no valido",
            "path": "id",
            "location": "params"
        }]
    })
)]
pub struct ValidationFailedResponse(pub ValidationErrors);

#[derive(ToResponse)]
#[response(
    description = "Not Found - No product with that id",
    content_type = "application/json",
    example = json!({"error": "Producto no encontrado"})
)]
pub struct ProductNotFoundResponse(pub NotFoundBody);

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        replace_product,
        toggle_availability,
        delete_product,
    ),
    components(
        schemas(
            Product, CreateProduct, ReplaceProduct,
            ValidationErrors, FieldError, Location, NotFoundBody
        ),
        responses(
            ValidationFailedResponse,
            ProductNotFoundResponse,
            InvalidJsonResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalogue endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product)
                .put(replace_product)
                .patch(toggle_availability)
                .delete(delete_product),
        )
        .with_state(shared_service)
}

/// The `{id}` segment as text.
///
/// A segment axum cannot decode (invalid UTF-8) is kept percent-encoded, so it
/// still reaches the id rule and is reported as a field error.
fn raw_id(path: Result<Path<String>, PathRejection>, uri: &Uri) -> String {
    match path {
        Ok(Path(id)) => id,
        Err(rejection) => {
            tracing::debug!(%rejection, "Undecodable product id");
            uri.path()
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string()
        }
    }
}

/// List every product, newest first
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    responses(
        (status = 200, description = "List of products", body = Envelope<Vec<Product>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<Envelope<Vec<Product>>>> {
    let products = service.list_products().await?;
    Ok(Json(Envelope::new(products)))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = Envelope<Product>),
        (status = 400, response = ValidationFailedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    JsonBody(body): JsonBody,
) -> ProductResult<impl IntoResponse> {
    let input = rules::create_product(&body)?;
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(Envelope::new(product))))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Envelope<Product>),
        (status = 400, response = ValidationFailedResponse),
        (status = 404, response = ProductNotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    uri: Uri,
    path: Result<Path<String>, PathRejection>,
) -> ProductResult<Json<Envelope<Product>>> {
    let id = rules::product_id(&raw_id(path, &uri))?;
    let product = service.get_product(id).await?;
    Ok(Json(Envelope::new(product)))
}

/// Replace name, price and availability of a product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = ReplaceProduct,
    responses(
        (status = 200, description = "Product updated successfully", body = Envelope<Product>),
        (status = 400, response = ValidationFailedResponse),
        (status = 404, response = ProductNotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn replace_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    uri: Uri,
    path: Result<Path<String>, PathRejection>,
    JsonBody(body): JsonBody,
) -> ProductResult<Json<Envelope<Product>>> {
    let (id, input) = rules::replace_product(&raw_id(path, &uri), &body)?;
    let product = service.replace_product(id, input).await?;
    Ok(Json(Envelope::new(product)))
}

/// Flip the availability of a product
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Availability toggled", body = Envelope<Product>),
        (status = 400, response = ValidationFailedResponse),
        (status = 404, response = ProductNotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn toggle_availability<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    uri: Uri,
    path: Result<Path<String>, PathRejection>,
) -> ProductResult<Json<Envelope<Product>>> {
    let id = rules::product_id(&raw_id(path, &uri))?;
    let product = service.toggle_availability(id).await?;
    Ok(Json(Envelope::new(product)))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted", body = Envelope<String>),
        (status = 400, response = ValidationFailedResponse),
        (status = 404, response = ProductNotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    uri: Uri,
    path: Result<Path<String>, PathRejection>,
) -> ProductResult<Json<Envelope<&'static str>>> {
    let id = rules::product_id(&raw_id(path, &uri))?;
    service.delete_product(id).await?;
    Ok(Json(Envelope::new(DELETED_MESSAGE)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryProductRepository;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_list_on_empty_store() {
        let app = router(ProductService::new(InMemoryProductRepository::new()));
        let (status, body) = send(app, "GET", "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"data": []}));
    }

    #[tokio::test]
    async fn test_bodyless_post_reports_every_missing_field() {
        let app = router(ProductService::new(InMemoryProductRepository::new()));
        let (status, body) = send(app, "POST", "/").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_invalid_id_is_rejected_before_lookup() {
        let app = router(ProductService::new(InMemoryProductRepository::new()));
        let (status, body) = send(app, "PATCH", "/abc").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["value"], "abc");
    }

    #[test]
    fn test_openapi_lists_product_routes() {
        let doc = ApiDoc::openapi();
        assert_eq!(doc.paths.paths.len(), 2);

        let by_id = &doc.paths.paths["/{id}"];
        assert!(by_id.get.is_some());
        assert!(by_id.put.is_some());
        assert!(by_id.patch.is_some());
        assert!(by_id.delete.is_some());
    }
}
