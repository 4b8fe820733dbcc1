use rocket::http::Header;
use rocket::{
    Request, Response,
    fairing::{Fairing, Info, Kind},
};

/// Injects CORS headers for the single configured caller origin.
pub struct Cors {
    allowed_origin: String,
}

impl Cors {
    pub fn new(allowed_origin: &str) -> Self {
        Self {
            allowed_origin: allowed_origin.to_string(),
        }
    }
}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "CORS",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new(
            "Access-Control-Allow-Origin",
            self.allowed_origin.clone(),
        ));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "GET, POST, PUT, DELETE, OPTIONS",
        ));
        response.set_header(Header::new(
            "Access-Control-Allow-Headers",
            "Authorization, Content-Type",
        ));
    }
}

// Preflight requests match here; the fairing supplies the headers.
#[options("/<_..>")]
pub fn cors_preflight() {}
