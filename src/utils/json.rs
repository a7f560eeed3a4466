use std::fs;
use crate::component::Solution;
use super::error::Error;


pub fn save_solution(path: &str, solution: &Solution) -> Result<(), Error> {
    let text = serde_json::to_string_pretty(solution)?;
    fs::write(path, text)?;
    Ok(())
}

pub fn load_solution(path: &str) -> Result<Solution, Error> {
    let text = fs::read_to_string(path)?;
    let solution = serde_json::from_str(&text)?;
    Ok(solution)
}
