use chrono::{DateTime, FixedOffset};
use clap::Args;
use loki_sdk::{Client, QueryRangeRequest};

#[derive(Args, Debug)]
pub struct QueryRangeArgs {
    /// LogQL query
    query: String,

    /// Maximum number of entries to return (server default: 100)
    #[arg(long)]
    limit: Option<u32>,

    /// Start of the range, RFC 3339 (server default: one hour ago)
    #[arg(long, value_parser = DateTime::<FixedOffset>::parse_from_rfc3339)]
    start: Option<DateTime<FixedOffset>>,

    /// End of the range, RFC 3339 (server default: now)
    #[arg(long, value_parser = DateTime::<FixedOffset>::parse_from_rfc3339)]
    end: Option<DateTime<FixedOffset>>,

    /// Sort order: forward or backward (server default: backward)
    #[arg(long)]
    direction: Option<String>,

    /// Print the response on a single line
    #[arg(long)]
    compact: bool,
}

impl QueryRangeArgs {
    pub fn to_request(&self) -> Result<QueryRangeRequest, loki_sdk::SdkError> {
        let mut request = QueryRangeRequest::new(self.query.clone());
        if let Some(limit) = self.limit {
            request = request.limit(limit);
        }
        if let Some(start) = self.start {
            request = request.start(start);
        }
        if let Some(end) = self.end {
            request = request.end(end);
        }
        // An empty value means no direction, like an absent flag
        if let Some(direction) = self.direction.as_deref().filter(|d| !d.is_empty()) {
            request = request.try_direction(direction)?;
        }
        Ok(request)
    }

    pub async fn run(self, client: &Client) -> anyhow::Result<()> {
        let request = self.to_request()?;
        let body = client.query_range(&request).await?;

        if self.compact {
            println!("{}", serde_json::to_string(&body)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Ok(())
    }
}
