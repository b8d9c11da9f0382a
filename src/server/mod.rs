pub mod routes;

use std::net::TcpListener;
use std::path::PathBuf;

use actix_files::Files;
use actix_web::{
    App, HttpServer,
    dev::{Server, ServiceRequest, fn_service},
    middleware::Logger,
    web,
};

use crate::pipeline::Pipeline;

pub fn run(
    listener: TcpListener,
    pipeline: Pipeline,
    static_dir: PathBuf,
) -> Result<Server, std::io::Error> {
    let pipeline = web::Data::new(pipeline);

    let server = HttpServer::new(move || {
        let error_page = static_dir.join("error.html");
        App::new()
            .wrap(Logger::default())
            .app_data(pipeline.clone())
            .service(routes::standings)
            .service(routes::standings_for_list)
            .service(
                Files::new("/", static_dir.clone())
                    .index_file("index.html")
                    .default_handler(fn_service(move |req: ServiceRequest| {
                        let error_page = error_page.clone();
                        async move { routes::fallback(req, error_page).await }
                    })),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
