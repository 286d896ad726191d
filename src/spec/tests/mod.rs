mod tests_pattern;
