//! Mock feed data
//!
//! Stands in for a real post source; each returned post is annotated by the
//! same sampling-backed classification the sentiment tool uses

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tools::context::{ToolCallError, ToolContext, ToolInvocation};
use crate::tools::handlers::sentiment;
use crate::tools::registry::ToolHandler;

/// One feed entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
  pub post_id: String,
  pub author: String,
  pub published_date: String,
  pub published_time: String,
  pub content: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sentiment: Option<String>,
}

fn post(id: &str, author: &str, date: &str, time: &str, content: &str) -> Post {
  Post {
    post_id: id.to_string(),
    author: author.to_string(),
    published_date: date.to_string(),
    published_time: time.to_string(),
    content: content.to_string(),
    sentiment: None,
  }
}

pub fn mock_posts() -> Vec<Post> {
  vec![
    post(
      "1001",
      "tech_enthusiast",
      "2023-01-01",
      "08:30",
      "A new year begins. Hoping to pick up plenty of new skills and level up this year!",
    ),
    post(
      "1002",
      "foodie_lee",
      "2023-01-01",
      "12:15",
      "Tried a new recipe today and it failed completely. Wasted a whole afternoon, feeling terrible.",
    ),
    post(
      "1003",
      "travel_pro",
      "2023-01-01",
      "16:45",
      "Just wrapped up an island trip. The scenery was breathtaking, absolutely worth it!",
    ),
    post(
      "1004",
      "fitness_coach",
      "2023-01-02",
      "07:00",
      "Ran five kilometers before sunrise. Feeling energized, a good day starts with a workout.",
    ),
    post(
      "1005",
      "student_wang",
      "2023-01-02",
      "22:30",
      "Final exams are finally over. Time to rest for a few days.",
    ),
  ]
}

#[derive(Debug, Deserialize)]
struct FeedArgs {
  #[serde(default = "default_limit")]
  limit: usize,
}

fn default_limit() -> usize {
  5
}

pub struct FetchPostsHandler;

#[async_trait]
impl ToolHandler for FetchPostsHandler {
  async fn handle(
    &self,
    invocation: ToolInvocation,
    ctx: &ToolContext,
  ) -> Result<Value, ToolCallError> {
    let args: FeedArgs = invocation.parse_arguments()?;

    let mut posts = mock_posts();
    posts.truncate(args.limit);

    // One sample round-trip per post, strictly sequential.
    for post in &mut posts {
      let sentiment = sentiment::classify(&post.content, ctx).await?;
      post.sentiment = Some(sentiment.to_string());
    }

    serde_json::to_value(&posts).map_err(|e| ToolCallError::Internal(e.to_string()))
  }
}
