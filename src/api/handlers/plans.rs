use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};

use super::{created, error::bad_request, page_params, ErrorBody, Gate};
use crate::{
    access::Privilege,
    hierarchy::HierarchyManager,
    model::{EntityKind, Plan, PlanInput},
    pagination::PageParams,
};

#[utoipa::path(
    get,
    path = "/v1/plans",
    params(PageParams),
    responses(
        (status = 200, description = "Plans, paged when `page` or `limit` is supplied.", body = [Plan]),
        (status = 400, description = "Invalid paging parameters.", body = ErrorBody),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing READ_PLAN.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "plans"
)]
pub async fn list_plans(
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::read(EntityKind::Plan))
        .await
    {
        return err.into_response();
    }

    let params = match page_params(query) {
        Ok(params) => params,
        Err(response) => return response,
    };

    match manager.list_plans(params).await {
        Ok(listing) => Json(listing).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/v1/plans",
    request_body = PlanInput,
    responses(
        (status = 201, description = "Plan created.", body = Plan),
        (status = 400, description = "Invalid input.", body = ErrorBody),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing CREATE_PLAN.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "plans"
)]
pub async fn create_plan(
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
    payload: Result<Json<PlanInput>, JsonRejection>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::create(EntityKind::Plan))
        .await
    {
        return err.into_response();
    }

    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match manager.create_plan(input).await {
        Ok(plan) => created(&format!("/v1/plans/{}", plan.id), &plan),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/v1/plans/{plan_id}",
    params(("plan_id" = String, Path, description = "Plan id")),
    responses(
        (status = 200, description = "Plan found.", body = Plan),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing READ_PLAN.", body = ErrorBody),
        (status = 404, description = "Plan not found.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "plans"
)]
pub async fn get_plan(
    Path(plan_id): Path<String>,
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::read(EntityKind::Plan))
        .await
    {
        return err.into_response();
    }

    match manager.find_plan(&plan_id).await {
        Ok(plan) => Json(plan).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/plans/{plan_id}",
    params(("plan_id" = String, Path, description = "Plan id")),
    responses(
        (status = 204, description = "Plan deleted."),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing DELETE_PLAN.", body = ErrorBody),
        (status = 404, description = "Plan not found.", body = ErrorBody),
        (status = 409, description = "Plan still referenced by an api.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "plans"
)]
pub async fn delete_plan(
    Path(plan_id): Path<String>,
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::delete(EntityKind::Plan))
        .await
    {
        return err.into_response();
    }

    match manager.delete_plan(&plan_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
