mod tests_collection;
mod tests_porter;
