mod chat_stamper;
mod fanout;

pub use chat_stamper::*;
pub use fanout::*;
