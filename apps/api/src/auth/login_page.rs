use toolgate_domain::RequestedPermission;

/// Renders the login form. Every dynamic value is HTML-escaped.
pub(super) fn render(error: Option<&str>, requested: &RequestedPermission) -> String {
    let error_block = error
        .filter(|message| !message.trim().is_empty())
        .map(|message| format!("<p class=\"error\" role=\"alert\">{}</p>", escape(message)))
        .unwrap_or_default();

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Tool login</title>
</head>
<body>
<main>
<h1>Log in to use {permission}</h1>
{error_block}
<form method="post" action="/login">
<label>Username <input name="username" autocomplete="username" required></label>
<label>Password <input name="password" type="password" autocomplete="current-password" required></label>
<button type="submit">Log in</button>
</form>
</main>
</body>
</html>
"#,
        permission = escape(requested.as_str()),
    )
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use toolgate_domain::PermissionWhitelist;

    use super::*;

    #[test]
    fn error_message_is_escaped() {
        let laser = PermissionWhitelist::default_tools()
            .admit("laser")
            .unwrap_or_else(|_| panic!("test"));
        let page = render(Some("<script>alert(1)</script>"), &laser);

        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>"));
        assert!(page.contains("Log in to use laser"));
    }

    #[test]
    fn blank_error_renders_no_alert() {
        let laser = PermissionWhitelist::default_tools()
            .admit("laser")
            .unwrap_or_else(|_| panic!("test"));
        assert!(!render(None, &laser).contains("role=\"alert\""));
        assert!(!render(Some(" "), &laser).contains("role=\"alert\""));
    }
}
