use std::path::PathBuf;

use actix_files::NamedFile;
use actix_web::{
    HttpResponse, Responder,
    dev::{ServiceRequest, ServiceResponse},
    get, web,
};
use tracing::{error, info};

use crate::models::{ApiResponse, MSG_GENERIC_FAILURE};
use crate::pipeline::Pipeline;
use crate::scraper::standings_url;

async fn respond(
    pipeline: &Pipeline,
    group_id: &str,
    contest_id: &str,
    page: &str,
    list_id: Option<&str>,
) -> HttpResponse {
    let resp = match standings_url(pipeline.base_url(), group_id, contest_id, page, list_id) {
        Ok(url) => pipeline.run(&url).await,
        Err(e) => {
            error!("Cannot build standings URL: {:#}", e);
            ApiResponse::failed(MSG_GENERIC_FAILURE, Some(format!("{:#}", e)))
        }
    };
    HttpResponse::Ok().json(resp)
}

#[get("/g/{group_id}/c/{contest_id}/p/{page}")]
pub async fn standings(
    path: web::Path<(String, String, String)>,
    pipeline: web::Data<Pipeline>,
) -> impl Responder {
    let (group_id, contest_id, page) = path.into_inner();
    respond(&pipeline, &group_id, &contest_id, &page, None).await
}

#[get("/g/{group_id}/c/{contest_id}/p/{page}/l/{list_id}")]
pub async fn standings_for_list(
    path: web::Path<(String, String, String, String)>,
    pipeline: web::Data<Pipeline>,
) -> impl Responder {
    let (group_id, contest_id, page, list_id) = path.into_inner();
    respond(&pipeline, &group_id, &contest_id, &page, Some(&list_id)).await
}

/// Anything that is neither a route nor a static file gets the error page.
pub async fn fallback(
    req: ServiceRequest,
    error_page: PathBuf,
) -> Result<ServiceResponse, actix_web::Error> {
    let (req, _) = req.into_parts();
    info!("Invalid route accessed: {}", req.uri());
    let file = NamedFile::open_async(error_page).await?;
    let res = file.into_response(&req);
    Ok(ServiceResponse::new(req, res))
}
