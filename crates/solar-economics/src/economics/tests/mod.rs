mod calculator;
mod common;
mod eligibility;
mod scoring;
mod sizing;
