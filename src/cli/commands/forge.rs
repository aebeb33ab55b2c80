//! Demo data command handler

use crate::config::Config;
use crate::db::Store;

pub const DEMO_NAME: &str = "良多";

pub const DEMO_MOVIES: &[(&str, &str)] = &[
    ("霸王别姬", "1993"),
    ("重庆森林", "1994"),
    ("花样年华", "2000"),
    ("蓝宇", "2001"),
    ("孽子", "2003"),
    ("色，戒", "2007"),
    ("欲盖弄潮", "2007"),
    ("步履不停", "2008"),
    ("机器人总动员", "2008"),
    ("触不可及", "2011"),
    ("万箭穿心", "2012"),
    ("烈日灼心", "2015"),
    ("驴得水", "2016"),
    ("完美陌生人", "2016"),
    ("看不见的客人", "2016"),
    ("请以你的名字呼唤我", "2017"),
    ("谁先爱上他的", "2018"),
    ("白蛇：缘起", "2019"),
    ("罗小黑战记", "2019"),
];

pub async fn cmd_forge(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    // Renames an existing owner rather than adding a second account
    store.upsert_owner_name(DEMO_NAME).await?;
    let inserted = store.add_movies(DEMO_MOVIES).await?;

    tracing::info!("Forged {} demo movies", inserted);
    println!("Done.");
    Ok(())
}
