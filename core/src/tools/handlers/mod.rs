pub mod calculator;
pub mod feed;
pub mod sentiment;

use std::sync::Arc;

use crate::tools::registry::ToolRegistry;
use crate::tools::spec;

pub fn register_builtin_tools(registry: &mut ToolRegistry) {
  registry.register_tool(spec::add_tool(), Arc::new(calculator::AddHandler));
  registry.register_tool(spec::subtract_tool(), Arc::new(calculator::SubtractHandler));
  registry.register_tool(spec::multiply_tool(), Arc::new(calculator::MultiplyHandler));
  registry.register_tool(spec::divide_tool(), Arc::new(calculator::DivideHandler));
  registry.register_tool(
    spec::analyze_sentiment_tool(),
    Arc::new(sentiment::AnalyzeSentimentHandler),
  );
  registry.register_tool(spec::fetch_posts_tool(), Arc::new(feed::FetchPostsHandler));
}
