pub mod row_select;

#[cfg(test)]
mod row_select_tests;
