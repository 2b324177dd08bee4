use actix_web::web;

pub mod routes {
    pub mod file;
}

pub fn mount_files() -> actix_web::Scope {
    web::scope("/files")
        .service(routes::file::post_upload)
        .service(routes::file::get_download)
}
