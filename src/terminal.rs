// Terminal front end: the same stylist flow as the web UI, over stdin/stdout.

use anyhow::{bail, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::info;

use crate::catalog::{Occasion, Weather};
use crate::recommendation::StyledLook;
use crate::stylist::{ChatOutcome, RecommendationOutcome, Stylist};

const QUIT_COMMAND: &str = "/quit";

pub fn format_catalog() -> String {
    let mut out = String::from("Occasions:\n");
    for occasion in Occasion::ALL {
        out.push_str(&format!("  {:<12} {} {}\n", occasion.slug(), occasion.icon(), occasion.label()));
    }
    out.push_str("Weather:\n");
    for weather in Weather::ALL {
        out.push_str(&format!("  {:<12} {} {}\n", weather.slug(), weather.icon(), weather.label()));
    }
    out
}

pub fn format_look(look: &StyledLook) -> String {
    let rec = &look.recommendation;
    format!(
        "Your {} look for {} weather\n\nOutfit:       {}\nFootwear:     {}\nAccessories:  {}\nStyling tips: {}\n",
        look.occasion.label(),
        look.weather.label(),
        rec.outfit,
        rec.footwear,
        rec.accessories,
        rec.styling_tips,
    )
}

/// Selects the pair, asks for a recommendation and prints it.
pub async fn style_once<W>(stylist: &Stylist, occasion: Occasion, weather: Weather, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    stylist.set_occasion(occasion).await;
    stylist.set_weather(weather).await;

    match stylist.request_recommendation().await {
        RecommendationOutcome::Applied(_) => {}
        RecommendationOutcome::Failed => {
            bail!("Couldn't get a recommendation from the model. Check GEMINI_API_KEY and try again.")
        }
        // Both selections were just set and nothing else is running.
        other => bail!("Recommendation was not requested: {:?}", other),
    }

    let look = stylist.session().await.look().cloned();
    if let Some(look) = look {
        out.write_all(format_look(&look).as_bytes()).await?;
    }
    out.flush().await?;
    Ok(())
}

/// Prints a recommendation, then answers follow-up questions line by line
/// until EOF or `/quit`.
pub async fn run_chat_session<R, W>(
    stylist: &Stylist,
    occasion: Occasion,
    weather: Weather,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    style_once(stylist, occasion, weather, out).await?;

    stylist.open_chat().await;
    let greeting = stylist
        .session()
        .await
        .transcript()
        .first()
        .map(|m| m.text.clone())
        .unwrap_or_default();
    out.write_all(format!("\nstylist> {}\n", greeting).as_bytes()).await?;
    out.write_all(format!("(type your question, or {} to leave)\n", QUIT_COMMAND).as_bytes())
        .await?;
    out.flush().await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == QUIT_COMMAND {
            break;
        }

        match stylist.send_chat_message(line).await {
            ChatOutcome::Replied(reply) => {
                out.write_all(format!("stylist> {}\n", reply.text).as_bytes()).await?;
            }
            ChatOutcome::EmptyMessage => continue,
            other => info!(?other, "Chat message was not answered"),
        }
        out.flush().await?;
    }

    stylist.close_chat().await;
    info!("Chat session finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::Recommendation;

    #[test]
    fn test_format_catalog_lists_everything() {
        let text = format_catalog();
        for occasion in Occasion::ALL {
            assert!(text.contains(occasion.slug()));
        }
        for weather in Weather::ALL {
            assert!(text.contains(weather.label()));
        }
    }

    #[test]
    fn test_format_look_shows_all_fields() {
        let look = StyledLook {
            occasion: Occasion::Business,
            weather: Weather::Rainy,
            recommendation: Recommendation {
                outfit: "Navy suit".to_string(),
                footwear: "Leather oxfords".to_string(),
                accessories: "Umbrella".to_string(),
                styling_tips: "Layer for rain".to_string(),
            },
        };
        let text = format_look(&look);
        assert!(text.starts_with("Your Business look for Rainy weather"));
        assert!(text.contains("Outfit:       Navy suit"));
        assert!(text.contains("Styling tips: Layer for rain"));
    }
}
