use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

const BRAVE_SEARCH_URL: &str = "https://api.search.brave.com/res/v1/web/search";
const SERPER_SEARCH_URL: &str = "https://google.serper.dev/search";

/// `brave_search(query, num_results)` — §4.1.
pub async fn brave_search(client: &reqwest::Client, api_key: &SecretString, query: &str, num_results: u32) -> String {
    let response = client
        .get(BRAVE_SEARCH_URL)
        .header("Accept", "application/json")
        .header("X-Subscription-Token", api_key.expose_secret())
        .query(&[("q", query), ("count", &num_results.to_string())])
        .send()
        .await;

    let response = match response {
        Ok(response) => response,
        Err(error) => return format!("Brave search failed: {error}"),
    };
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return format!("Brave API error {}: {body}", status.as_u16());
    }
    match response.json().await {
        Ok(body) => format_brave_results(&body, num_results),
        Err(error) => format!("Brave search failed: {error}"),
    }
}

fn format_brave_results(body: &Value, num_results: u32) -> String {
    let results = body["web"]["results"].as_array().cloned().unwrap_or_default();
    if results.is_empty() {
        return "No results found.".to_string();
    }
    results
        .into_iter()
        .take(num_results as usize)
        .enumerate()
        .map(|(i, result)| {
            let title = result["title"].as_str().unwrap_or("No title");
            let url = result["url"].as_str().unwrap_or("");
            let description = result["description"].as_str().unwrap_or("");
            format!("[{}] {title}\nURL: {url}\n{description}\n", i + 1)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `serper_search(query, num_results)` — §4.1, surfaces `answerBox` and
/// `knowledgeGraph` highlights when present.
pub async fn serper_search(client: &reqwest::Client, api_key: &SecretString, query: &str, num_results: u32) -> String {
    let response = client
        .get(SERPER_SEARCH_URL)
        .header("X-API-KEY", api_key.expose_secret())
        .header("Content-Type", "application/json")
        .query(&[("q", query), ("num", &num_results.to_string())])
        .send()
        .await;

    let response = match response {
        Ok(response) => response,
        Err(error) => return format!("Serper search failed: {error}"),
    };
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return format!("Serper API error {}: {body}", status.as_u16());
    }
    match response.json().await {
        Ok(body) => format_serper_results(&body, num_results),
        Err(error) => format!("Serper search failed: {error}"),
    }
}

fn format_serper_results(body: &Value, num_results: u32) -> String {
    let mut lines = Vec::new();
    if let Some(answer_box) = body.get("answerBox") {
        let title = answer_box["title"].as_str().unwrap_or("");
        let answer = answer_box["answer"].as_str().unwrap_or("");
        let snippet = answer_box["snippet"].as_str().unwrap_or("");
        lines.push(format!("[Featured] {title}{answer}{snippet}\n"));
    }
    if let Some(knowledge_graph) = body.get("knowledgeGraph") {
        let title = knowledge_graph["title"].as_str().unwrap_or("");
        let description = knowledge_graph["description"].as_str().unwrap_or("");
        lines.push(format!("[Knowledge] {title}: {description}\n"));
    }
    for (i, result) in body["organic"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .take(num_results as usize)
        .enumerate()
    {
        let title = result["title"].as_str().unwrap_or("");
        let link = result["link"].as_str().unwrap_or("");
        let snippet = result["snippet"].as_str().unwrap_or("");
        lines.push(format!("[{}] {title}\nURL: {link}\n{snippet}\n", i + 1));
    }

    if lines.is_empty() {
        "No results found.".to_string()
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn brave_results_format_with_index_and_url() {
        let body = json!({"web": {"results": [
            {"title": "Rust", "url": "https://rust-lang.org", "description": "A systems language"},
        ]}});
        let formatted = format_brave_results(&body, 3);
        assert!(formatted.starts_with("[1] Rust"));
        assert!(formatted.contains("https://rust-lang.org"));
    }

    #[test]
    fn brave_results_empty_is_no_results_found() {
        let body = json!({"web": {"results": []}});
        assert_eq!(format_brave_results(&body, 3), "No results found.");
    }

    #[test]
    fn serper_results_surface_answer_box_before_organic() {
        let body = json!({
            "answerBox": {"title": "T", "answer": "42", "snippet": ""},
            "organic": [{"title": "Result", "link": "https://example.com", "snippet": "s"}],
        });
        let formatted = format_serper_results(&body, 3);
        let answer_pos = formatted.find("[Featured]").unwrap();
        let organic_pos = formatted.find("[1]").unwrap();
        assert!(answer_pos < organic_pos);
    }

    #[test]
    fn serper_results_empty_is_no_results_found() {
        let body = json!({});
        assert_eq!(format_serper_results(&body, 3), "No results found.");
    }
}
