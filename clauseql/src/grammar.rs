use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "clauseql.pest"]
pub struct ClauseqlParser;
