use morse_buzzer::{morse_table, Dispatcher, DispatcherConfig, Player, RodioBuzzer, ToneSettings};

#[tokio::main]
async fn main() -> morse_buzzer::Result<()> {
    stderrlog::new()
        .module("morse_buzzer")
        .verbosity(log::Level::Debug)
        .timestamp(stderrlog::Timestamp::Millisecond)
        .init()
        .ok();

    let text = "HELLO WORLD";
    println!("{text}: {}", morse_table::render(text));

    // Direct, blocking playback on a borrowed buzzer.
    let mut buzzer = RodioBuzzer::new(ToneSettings::default())?;
    let mut player = Player::new(&mut buzzer, text, 17)?;
    println!("playing for {:?}", player.duration());
    player.play()?;
    drop(buzzer);

    // Same thing through the request queue.
    let dispatcher = Dispatcher::spawn(|| RodioBuzzer::new(ToneSettings::default()), DispatcherConfig::default());
    dispatcher.submit("sos sos", Some(20))?;
    dispatcher.submit("73", None)?;
    dispatcher.wait_idle().await;
    println!("{:?}", dispatcher.status());
    Ok(())
}
