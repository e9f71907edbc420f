//! Mock camera device serving the endpoints of the embedded web server.

use actix_multipart::form::{MultipartForm, bytes::Bytes, text::Text};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, http::StatusCode, web};
use std::sync::{Arc, Mutex};

pub const SETTINGS_JSON: &str = r#"{
    "global": {
        "name": { "type": "str", "value": "MyCam" }
    },
    "camera": {
        "framesize": {
            "type": "enum",
            "value": "VGA-640x480",
            "enum": ["QVGA-320x240", "VGA-640x480", "SVGA-800x600"]
        },
        "quality": { "type": "int", "value": 10, "min": 4, "max": 63 },
        "gain": { "type": "int", "value": 5, "min": 0, "max": 30 },
        "sensor": { "type": "str", "value": "OV2640" }
    }
}"#;

pub const BOOTING: &str = "Upload successful, booting new firmware ...";

/// One request as the device saw it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: String,
    pub fields: Vec<(String, String)>,
    pub file: Option<(Option<String>, Vec<u8>)>,
}

#[derive(Debug)]
pub struct DeviceState {
    settings: (StatusCode, String),
    ignored_body: Vec<u8>,
    ota: (StatusCode, String),
    wifi: (StatusCode, String),
    requests: Mutex<Vec<Recorded>>,
}

impl Default for DeviceState {
    fn default() -> Self {
        DeviceState {
            settings: (StatusCode::OK, SETTINGS_JSON.to_string()),
            ignored_body: b"OK".to_vec(),
            ota: (StatusCode::OK, BOOTING.to_string()),
            wifi: (StatusCode::OK, "wifi settings saved".to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl DeviceState {
    pub fn with_settings(mut self, status: StatusCode, body: &str) -> Self {
        self.settings = (status, body.to_string());
        self
    }

    /// Body of the `/set` and `/cmd` answers.
    pub fn with_ignored_body(mut self, body: &[u8]) -> Self {
        self.ignored_body = body.to_vec();
        self
    }

    pub fn with_ota(mut self, status: StatusCode, body: &str) -> Self {
        self.ota = (status, body.to_string());
        self
    }

    fn record(&self, req: &HttpRequest, recorded: Recorded) {
        self.requests.lock().unwrap().push(Recorded {
            method: req.method().to_string(),
            path: req.path().to_string(),
            query: req.query_string().to_string(),
            ..recorded
        });
    }
}

pub struct MockDevice {
    pub url: String,
    state: Arc<DeviceState>,
}

impl MockDevice {
    pub async fn start(state: DeviceState) -> Self {
        let state = Arc::new(state);
        let data = state.clone();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::from(data.clone()))
                .route("/settings.json", web::get().to(settings))
                .route("/set", web::get().to(ignored))
                .route("/cmd", web::get().to(ignored))
                .route("/ota", web::post().to(ota))
                .route("/wifi", web::post().to(wifi))
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("bind mock device");

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());

        MockDevice {
            url: format!("http://{addr}"),
            state,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

#[derive(MultipartForm)]
#[multipart(deny_unknown_fields, duplicate_field = "deny")]
struct OtaForm {
    #[multipart(rename = "esp-pwd")]
    password: Text<String>,
    firmware: Bytes,
}

#[derive(MultipartForm)]
#[multipart(deny_unknown_fields, duplicate_field = "deny")]
struct WifiForm {
    #[multipart(rename = "esp-pwd")]
    password: Text<String>,
    #[multipart(rename = "wifi-ssid")]
    ssid: Text<String>,
    #[multipart(rename = "wifi-pwd")]
    wifi_password: Text<String>,
}

async fn settings(state: web::Data<DeviceState>, req: HttpRequest) -> HttpResponse {
    state.record(&req, Recorded::default());
    let (status, body) = &state.settings;
    HttpResponse::build(*status).body(body.clone())
}

async fn ignored(state: web::Data<DeviceState>, req: HttpRequest) -> HttpResponse {
    state.record(&req, Recorded::default());
    HttpResponse::Ok().body(state.ignored_body.clone())
}

async fn ota(
    state: web::Data<DeviceState>,
    req: HttpRequest,
    MultipartForm(form): MultipartForm<OtaForm>,
) -> HttpResponse {
    state.record(
        &req,
        Recorded {
            fields: vec![("esp-pwd".to_string(), form.password.into_inner())],
            file: Some((form.firmware.file_name, form.firmware.data.to_vec())),
            ..Default::default()
        },
    );
    let (status, body) = &state.ota;
    HttpResponse::build(*status).body(body.clone())
}

async fn wifi(
    state: web::Data<DeviceState>,
    req: HttpRequest,
    MultipartForm(form): MultipartForm<WifiForm>,
) -> HttpResponse {
    state.record(
        &req,
        Recorded {
            fields: vec![
                ("esp-pwd".to_string(), form.password.into_inner()),
                ("wifi-ssid".to_string(), form.ssid.into_inner()),
                ("wifi-pwd".to_string(), form.wifi_password.into_inner()),
            ],
            ..Default::default()
        },
    );
    let (status, body) = &state.wifi;
    HttpResponse::build(*status).body(body.clone())
}
