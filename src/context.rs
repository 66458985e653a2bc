use crate::params::Params;

use hyper::{Body, Method, Request, Response, StatusCode};

/// Per-request state threaded through every unit of a router.
///
/// A `Context` owns the incoming request together with the two fields a
/// router rewrites while it descends into scoped routes: the logical `path`
/// and the captured `params`. Handlers answer by filling the response slot.
///
/// The logical path starts out as the request URI's path. Inside a
/// `route("/api", ..)` scope it is the remainder after `/api`, always
/// beginning with `/`.
#[derive(Debug)]
pub struct Context {
    request: Request<Body>,
    path: String,
    params: Params,
    response: Option<Response<Body>>,
}

impl Context {
    pub fn new(request: Request<Body>) -> Self {
        let path = match request.uri().path() {
            "" => "/".to_owned(),
            path => path.to_owned(),
        };

        Self {
            request,
            path,
            params: Params::default(),
            response: None,
        }
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    /// The path as seen from the current routing scope.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    pub fn request(&self) -> &Request<Body> {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut Request<Body> {
        &mut self.request
    }

    pub fn response(&self) -> Option<&Response<Body>> {
        self.response.as_ref()
    }

    pub fn response_mut(&mut self) -> Option<&mut Response<Body>> {
        self.response.as_mut()
    }

    pub fn set_response(&mut self, response: Response<Body>) {
        self.response = Some(response);
    }

    pub fn take_response(&mut self) -> Option<Response<Body>> {
        self.response.take()
    }

    /// Shorthand for answering with a status code and a body.
    pub fn respond(&mut self, status: StatusCode, body: impl Into<Body>) {
        let mut response = Response::new(body.into());
        *response.status_mut() = status;
        self.response = Some(response);
    }

    /// Replaces the scoped fields, handing back the previous ones.
    pub(crate) fn enter_scope(&mut self, path: String, params: Params) -> (String, Params) {
        (
            std::mem::replace(&mut self.path, path),
            std::mem::replace(&mut self.params, params),
        )
    }

    pub(crate) fn exit_scope(&mut self, (path, params): (String, Params)) {
        self.path = path;
        self.params = params;
    }
}

impl From<Request<Body>> for Context {
    fn from(request: Request<Body>) -> Self {
        Context::new(request)
    }
}
