use ammonia;

/// Renders the generated summary as an HTML fragment.
///
/// The summary comes from an external service, so it goes through ammonia's
/// whitelist sanitizer before newlines become `<br>`. Plain text is escaped
/// (`&` becomes `&amp;`), and markup such as `<script>` is stripped.
pub fn render_summary_html(summary: &str) -> String {
    ammonia::clean(summary).replace('\n', "<br>")
}
