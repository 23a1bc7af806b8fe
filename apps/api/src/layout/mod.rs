// Layout: the renderer-neutral contract plus the paginated print geometry
// derived from it. The preview renders the same contract as HTML.

pub mod contract;
pub mod font_metrics;
pub mod print;
