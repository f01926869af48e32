use gemini_prompt::{CallErr, Gemini, ModelCaller, ModelRef};

#[tokio::main]
async fn main() -> Result<(), CallErr> {
    let caller = Gemini::from_env(ModelRef::default())?;
    let resp = caller
        .simple_call("What is the derivative of x^2 + 3x + 2? Answer in one line.")
        .await?;
    println!("{}", resp);

    Ok(())
}
