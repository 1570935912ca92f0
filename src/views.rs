//! Server-rendered HTML pages.
//!
//! Pages are small enough that plain `format!` templates are used; every
//! interpolated value goes through `escape_html`.

use crate::services::prediction_file::PredictionTotals;

const STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto;padding:0 1rem}\
table{border-collapse:collapse}td,th{border:1px solid #ccc;padding:.25rem .75rem;text-align:right}\
.error{color:#b00020}.success{color:#1b5e20}label{display:block;margin:.5rem 0}";

/// Escape the five HTML-significant characters.
pub fn escape_html(s: &str) -> String {
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

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <nav><a href=\"/\">Home</a> | <a href=\"/location\">Location</a> | \
         <a href=\"/results\">Results</a></nav>\n{body}\n</body>\n</html>\n",
        title = escape_html(title),
    )
}

/// Landing page: time window + PV configuration forms posting JSON.
pub fn render_index() -> String {
    let body = r#"<h1>PV energy prediction</h1>
<form id="pv-form">
  <h2>PV system</h2>
  <label>Panel area (m²) <input name="area" required></label>
  <label>Panel efficiency (%) <input name="panel_efficiency" required></label>
  <label>Inverter efficiency (%) <input name="inverter_efficiency" required></label>
  <button type="submit">Save configuration</button>
</form>
<form id="predict-form">
  <h2>Prediction window</h2>
  <label>Latitude <input name="latitude" required></label>
  <label>Longitude <input name="longitude" required></label>
  <label>Start <input type="datetime-local" name="start_datetime" required></label>
  <label>End <input type="datetime-local" name="end_datetime" required></label>
  <button type="submit">Predict</button>
</form>
<p id="status"></p>
<script>
async function postJson(url, form) {
  const body = Object.fromEntries(new FormData(form).entries());
  const res = await fetch(url, {method: "POST", headers: {"Content-Type": "application/json"}, body: JSON.stringify(body)});
  const data = await res.json();
  document.getElementById("status").textContent = data.message || data.error;
  return res.ok;
}
document.getElementById("pv-form").addEventListener("submit", e => { e.preventDefault(); postJson("/submit_pv", e.target); });
document.getElementById("predict-form").addEventListener("submit", async e => {
  e.preventDefault();
  const cfg = await (await fetch("/check_pv_config")).json();
  if (!cfg.exists) { document.getElementById("status").textContent = "Save the PV configuration first."; return; }
  if (await postJson("/predict", e.target)) { window.location = "/results"; }
});
</script>"#;
    layout("PV energy prediction", body)
}

/// State of the location page.
#[derive(Debug, Default)]
pub struct LocationPage<'a> {
    pub latitude: Option<&'a str>,
    pub longitude: Option<&'a str>,
    pub error: Option<&'a str>,
    pub success: Option<&'a str>,
}

pub fn render_location(page: &LocationPage<'_>) -> String {
    let mut body = String::from("<h1>Enter location</h1>\n");
    if let Some(error) = page.error {
        body.push_str(&format!("<p class=\"error\">{}</p>\n", escape_html(error)));
    }
    if let Some(success) = page.success {
        body.push_str(&format!(
            "<p class=\"success\">{}</p>\n",
            escape_html(success)
        ));
    }
    body.push_str(&format!(
        "<form method=\"post\" action=\"/location\">\n\
         <label>Latitude <input name=\"latitude\" value=\"{}\"></label>\n\
         <label>Longitude <input name=\"longitude\" value=\"{}\"></label>\n\
         <button type=\"submit\">Save</button>\n</form>\n",
        escape_html(page.latitude.unwrap_or_default()),
        escape_html(page.longitude.unwrap_or_default()),
    ));
    layout("Location", &body)
}

/// Results table with the total row.
pub fn render_results(totals: &PredictionTotals) -> String {
    let mut rows = String::new();
    for row in &totals.rows {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            row.hour,
            escape_html(&row.estimated_energy)
        ));
    }
    let body = format!(
        "<h1>Estimated energy</h1>\n<table>\n\
         <thead><tr><th>Hour</th><th>Estimated Energy (kWh)</th></tr></thead>\n\
         <tbody>\n{rows}</tbody>\n\
         <tfoot><tr><th>Total</th><th id=\"total-energy\">{total}</th></tr></tfoot>\n</table>\n\
         <p><a href=\"/data/HourOrderAndEstimated.csv\">Download CSV</a></p>",
        total = totals.total_kwh,
    );
    layout("Results", &body)
}

pub fn render_error(message: &str) -> String {
    let body = format!(
        "<h1>Something went wrong</h1>\n<p class=\"error\">{}</p>",
        escape_html(message)
    );
    layout("Error", &body)
}
