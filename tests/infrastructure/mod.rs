mod observability;
mod rendering;
