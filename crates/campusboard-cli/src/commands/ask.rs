use campusboard_core::assistant;
use serde::Serialize;

#[derive(Serialize)]
struct Reply {
    intent: assistant::Intent,
    response: &'static str,
}

pub fn run(message: &str) -> Result<(), Box<dyn std::error::Error>> {
    let intent = assistant::classify(message);
    let reply = Reply {
        intent,
        response: assistant::response_for(intent),
    };
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}
