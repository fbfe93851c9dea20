//! HTML page rendering
//!
//! Pages are small enough to build with `format!`; every interpolated value
//! goes through [`escape_html`].

use dentscan_common::ClassificationResult;

const STYLE: &str = r#"
        body {
            font-family: system-ui, -apple-system, sans-serif;
            max-width: 640px;
            margin: 40px auto;
            padding: 20px;
            line-height: 1.6;
            background-color: #f7f9fb;
            color: #222;
        }
        h1 { color: #2b6cb0; }
        form { display: flex; flex-direction: column; gap: 12px; }
        input, button { padding: 8px; font-size: 1rem; }
        .error { color: #c53030; font-weight: bold; }
        .result img { max-width: 100%; border: 1px solid #ccc; border-radius: 6px; }
        .label { font-weight: bold; }
        nav { margin-top: 24px; }
"#;

/// Escape text for HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{style}</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape_html(title),
        style = STYLE,
        body = body,
    )
}

fn error_block(error: Option<&str>) -> String {
    match error {
        Some(message) => format!(r#"    <p class="error">{}</p>"#, escape_html(message)),
        None => String::new(),
    }
}

/// Login form, optionally with an error line
pub fn login_page(error: Option<&str>) -> String {
    let body = format!(
        r#"    <h1>DentScan</h1>
{error}
    <form method="post" action="/">
        <input type="text" name="username" placeholder="Username" required>
        <input type="password" name="password" placeholder="Password" required>
        <button type="submit">Log in</button>
    </form>"#,
        error = error_block(error),
    );
    page("DentScan - Login", &body)
}

/// Upload form, optionally with an error line
pub fn upload_page(error: Option<&str>) -> String {
    let body = format!(
        r#"    <h1>Upload a tooth photo</h1>
{error}
    <form method="post" action="/upload" enctype="multipart/form-data">
        <input type="file" name="file" accept=".png,.jpg,.jpeg,.gif" required>
        <button type="submit">Analyze</button>
    </form>
    <nav><a href="/logout">Log out</a></nav>"#,
        error = error_block(error),
    );
    page("DentScan - Upload", &body)
}

/// Analysis result with the retained image
pub fn result_page(result: &ClassificationResult, filename: &str) -> String {
    let body = format!(
        r#"    <h1>Analysis result</h1>
    <div class="result">
        <img src="/uploads/{filename}" alt="Uploaded tooth photo">
        <p><span class="label">Condition:</span> {category}</p>
        <p><span class="label">Damage:</span> {damage:.2}%</p>
        <p><span class="label">Recommendation:</span> {recommendation}</p>
    </div>
    <nav><a href="/upload">Analyze another photo</a> | <a href="/logout">Log out</a></nav>"#,
        filename = escape_html(filename),
        category = escape_html(result.category.label()),
        damage = result.severity,
        recommendation = escape_html(&result.recommendation),
    );
    page("DentScan - Result", &body)
}
