//! Server-side HTML pages.
//!
//! Pages are assembled from string builders; every piece of user or platform
//! supplied text goes through [`html_escape`].

use crate::db::LogEntry;
use crate::twitter::SearchHit;

/// Escapes HTML special characters to prevent XSS attacks.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn page(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="/css/style.css">
</head>
<body>
    <div class="container">
        <nav><a href="/hello">Post</a><a href="/logs">Logs</a></nav>
{content}    </div>
</body>
</html>"#,
        title = html_escape(title),
        content = content
    )
}

fn notice_block(notice: Option<&str>) -> String {
    match notice {
        Some(text) => format!(
            "        <p class=\"notice\">{}</p>\n",
            html_escape(text)
        ),
        None => String::new(),
    }
}

/// The post form, optionally showing the message that was just published.
pub fn hello_page(result: Option<&str>) -> String {
    let mut content = String::from("        <h1>ごーふぁったー</h1>\n");

    if let Some(message) = result {
        content.push_str(&format!(
            "        <p class=\"result\">{}</p>\n",
            html_escape(message)
        ));
    }

    content.push_str(
        r#"        <form method="post" action="/gotweets">
            <textarea name="message" rows="4" maxlength="120" placeholder="なんて日だ"></textarea>
            <button type="submit">GO!</button>
        </form>
        <h2>Search</h2>
        <form method="post" action="/tweets">
            <input type="text" name="text">
            <button type="submit">Search</button>
        </form>
"#,
    );

    page("gotweet", &content)
}

/// The publish log, in the order given.
pub fn logs_page(entries: &[LogEntry]) -> String {
    let mut content = String::from("        <h1>Logs</h1>\n");

    if entries.is_empty() {
        content.push_str("        <p>No messages have been posted yet.</p>\n");
    } else {
        content.push_str(
            r#"        <table>
            <thead>
                <tr>
                    <th>posted at</th>
                    <th>user</th>
                    <th>message</th>
                </tr>
            </thead>
            <tbody>
"#,
        );
        for entry in entries {
            content.push_str(&format!(
                "                <tr>\n                    <td>{}</td>\n                    <td>{}</td>\n                    <td class=\"message\">{}</td>\n                </tr>\n",
                entry.created_at.format("%Y-%m-%d %H:%M:%S"),
                html_escape(&entry.author),
                html_escape(&entry.message)
            ));
        }
        content.push_str("            </tbody>\n        </table>\n");
    }

    page("gotweet - logs", &content)
}

/// Search results for `query`. `notice` is shown above the list when set.
pub fn tweets_page(query: &str, hits: &[SearchHit], notice: Option<&str>) -> String {
    let mut content = format!(
        "        <h1>Search: {}</h1>\n",
        html_escape(query)
    );
    content.push_str(&notice_block(notice));

    if hits.is_empty() {
        if notice.is_none() {
            content.push_str("        <p>No tweets found.</p>\n");
        }
    } else {
        content.push_str("        <table>\n            <tbody>\n");
        for hit in hits {
            content.push_str(&format!(
                "                <tr>\n                    <td><a href=\"https://twitter.com/{screen}/status/{id}\">{user}</a> @{screen}<br>{date}</td>\n                    <td class=\"message\">{text}</td>\n                </tr>\n",
                screen = html_escape(&hit.screen_name),
                id = html_escape(&hit.tweet_id),
                user = html_escape(&hit.user),
                date = html_escape(&hit.date),
                text = html_escape(&hit.text)
            ));
        }
        content.push_str("            </tbody>\n        </table>\n");
    }

    page("gotweet - search", &content)
}
