//! Browser UI and JSON API.
//!
//! The page is a single form: type a full name, submit, read the predicted
//! gender (with a confidence bar when the classifier provides
//! probabilities) and the most informative training tokens.

use crate::Error;
use crate::model::{ClassScores, GenderModel, Prediction};
use axum::{
    Json, Router,
    extract::{Form, Query, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;

/// Shared immutable state: the loaded model.
pub struct AppState {
    pub model: GenderModel,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict_form))
        .route("/api/predict", get(predict_api))
        .with_state(state)
}

/// Run the web UI until the process is stopped.
pub async fn serve(bind: &str, model: GenderModel) -> anyhow::Result<()> {
    let addr: SocketAddr = bind.parse()?;
    let app = router(Arc::new(AppState { model }));

    tracing::info!("listening on {addr}");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

#[derive(Deserialize)]
pub struct PredictForm {
    #[serde(default)]
    pub full_name: String,
}

#[derive(Deserialize)]
pub struct PredictQuery {
    #[serde(default)]
    pub name: String,
}

#[derive(Serialize)]
pub struct PredictResponse {
    pub name: String,
    pub gender: &'static str,
    pub gender_vi: &'static str,
    pub confidence: Option<f64>,
    pub scores: Option<ClassScores>,
}

#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_page(&state.model, None))
}

async fn predict_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PredictForm>,
) -> Html<String> {
    let outcome = match state.model.predict(&form.full_name) {
        Ok(prediction) => PageOutcome::Prediction {
            input: form.full_name,
            prediction,
        },
        Err(Error::EmptyName) => PageOutcome::Warning {
            input: form.full_name,
            message: "Vui lòng nhập họ tên.".to_string(),
        },
        Err(e) => {
            tracing::error!(error = %e, "prediction failed");
            PageOutcome::Warning {
                input: form.full_name,
                message: "Không thể dự đoán họ tên này.".to_string(),
            }
        }
    };
    Html(render_page(&state.model, Some(&outcome)))
}

async fn predict_api(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PredictQuery>,
) -> std::result::Result<Json<PredictResponse>, (StatusCode, Json<ApiError>)> {
    match state.model.predict(&query.name) {
        Ok(prediction) => Ok(Json(PredictResponse {
            name: query.name,
            gender: prediction.gender.as_str(),
            gender_vi: prediction.gender.vietnamese(),
            confidence: prediction.scores.map(|s| s.confidence()),
            scores: prediction.scores,
        })),
        Err(e @ Error::EmptyName) => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: e.to_string(),
            }),
        )),
        Err(e) => {
            tracing::error!(error = %e, "prediction failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

enum PageOutcome {
    Prediction {
        input: String,
        prediction: Prediction,
    },
    Warning {
        input: String,
        message: String,
    },
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_page(model: &GenderModel, outcome: Option<&PageOutcome>) -> String {
    let input = match outcome {
        Some(PageOutcome::Prediction { input, .. }) | Some(PageOutcome::Warning { input, .. }) => {
            escape_html(input)
        }
        None => String::new(),
    };

    let result = match outcome {
        Some(PageOutcome::Prediction { prediction, .. }) => render_result(prediction),
        Some(PageOutcome::Warning { message, .. }) => {
            format!(r#"<div class="result warning">{}</div>"#, escape_html(message))
        }
        None => String::new(),
    };

    format!(
        r#"<!doctype html>
<html lang="vi">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Dự đoán giới tính theo họ tên</title>
<style>
body {{ font-family: system-ui, sans-serif; background: #f5f6f8; margin: 0; }}
main {{ max-width: 560px; margin: 3rem auto; background: #fff; padding: 2rem; border-radius: 8px; box-shadow: 0 1px 4px rgba(0,0,0,.1); }}
h1 {{ font-size: 1.4rem; }}
label {{ display: block; margin-bottom: .5rem; }}
input[type=text] {{ width: 100%; box-sizing: border-box; padding: .5rem; font-size: 1rem; margin-bottom: .75rem; }}
button {{ padding: .5rem 1.5rem; font-size: 1rem; cursor: pointer; }}
.result {{ margin-top: 1.5rem; padding: 1rem; border-radius: 6px; }}
.result.success {{ background: #e8f5e9; border: 1px solid #a5d6a7; }}
.result.warning {{ background: #fff8e1; border: 1px solid #ffe082; }}
.bar {{ background: #eceff1; border-radius: 4px; height: 12px; overflow: hidden; margin-top: .5rem; }}
.bar .fill {{ background: #43a047; height: 100%; }}
.tokens {{ margin-top: 2rem; }}
.tokens h2 {{ font-size: 1rem; }}
.tokens .row {{ display: flex; align-items: center; gap: .5rem; margin: .25rem 0; font-size: .85rem; }}
.tokens .tok {{ width: 6rem; text-align: right; }}
.tokens .bars {{ flex: 1; display: flex; height: 10px; background: #eceff1; border-radius: 4px; overflow: hidden; }}
.tokens .f {{ background: #ec407a; height: 100%; }}
.tokens .m {{ background: #42a5f5; height: 100%; }}
.tokens .n {{ width: 8rem; color: #78909c; }}
footer {{ margin-top: 2rem; color: #90a4ae; font-size: .8rem; }}
</style>
</head>
<body>
<main>
<h1>🚻 Dự đoán giới tính theo họ tên</h1>
<form method="post" action="/predict">
<label for="full_name">Nhập họ tên của bạn:</label>
<input id="full_name" name="full_name" type="text" value="{input}" autofocus>
<button type="submit">Dự đoán</button>
</form>
{result}
{tokens}
<footer>Mô hình: {algorithm} · {male} tên nam · {female} tên nữ</footer>
</main>
</body>
</html>"#,
        input = input,
        result = result,
        tokens = render_token_chart(model),
        algorithm = model.algorithm().as_str(),
        male = model.male_count(),
        female = model.female_count(),
    )
}

fn render_result(prediction: &Prediction) -> String {
    let mut html = format!(
        r#"<div class="result success"><p>Giới tính dự đoán: <strong>{}</strong></p>"#,
        prediction.gender.vietnamese()
    );
    if let Some(scores) = prediction.scores {
        let percent = scores.confidence() * 100.0;
        html.push_str(&format!(
            r#"<p>Độ tin cậy: {percent:.1}%</p><div class="bar"><div class="fill" style="width: {percent:.1}%"></div></div>"#
        ));
    }
    html.push_str("</div>");
    html
}

fn render_token_chart(model: &GenderModel) -> String {
    let stats = model.informative_tokens(10);
    if stats.is_empty() {
        return String::new();
    }

    let max = stats
        .iter()
        .map(|s| s.female.max(s.male))
        .max()
        .unwrap_or(1)
        .max(1) as f64;

    let mut rows = String::new();
    for stat in &stats {
        // Each class gets up to half the track width.
        let f_width = stat.female as f64 / max * 50.0;
        let m_width = stat.male as f64 / max * 50.0;
        rows.push_str(&format!(
            r#"<div class="row"><span class="tok">{}</span><div class="bars"><div class="f" style="width: {f_width:.1}%"></div><div class="m" style="width: {m_width:.1}%"></div></div><span class="n">nữ {} · nam {}</span></div>"#,
            escape_html(&stat.token),
            stat.female,
            stat.male,
        ));
    }

    format!(r#"<section class="tokens"><h2>Đặc trưng tiêu biểu</h2>{rows}</section>"#)
}
