use clap::Args;

use studyshare_core::browse::{
    BrowseItems, BrowseNavigator, BrowseRequest, BrowseServiceTrait, Bucket,
};

use super::listing::print_material;
use crate::main_lib::AppState;

#[derive(Args, Debug)]
pub struct BrowseArgs {
    /// Grade, subject and material type to open, in that order
    pub path: Vec<String>,

    /// Filter the items of the opened level
    #[arg(short, long)]
    pub search: Option<String>,
}

pub async fn browse(state: &AppState, args: BrowseArgs) -> anyhow::Result<()> {
    let mut navigator = BrowseNavigator::new();
    let mut request = navigator.start();
    for step in &args.path {
        request = navigator
            .select(step)
            .ok_or_else(|| anyhow::anyhow!("Nothing below '{}' to open", step))?;
    }

    load(state, &mut navigator, request).await;
    if let Some(search) = &args.search {
        navigator.set_search(search);
    }

    let breadcrumb = navigator.level().breadcrumb();
    if !breadcrumb.is_empty() {
        println!("{}", breadcrumb);
    }
    match navigator.visible_items() {
        None => println!("Could not load this level."),
        Some(items) if items.is_empty() => println!("Nothing here yet."),
        Some(BrowseItems::Grades(b))
        | Some(BrowseItems::Subjects(b))
        | Some(BrowseItems::Types(b)) => print_buckets(&b),
        Some(BrowseItems::Materials(materials)) => materials.iter().for_each(print_material),
    }
    Ok(())
}

async fn load(state: &AppState, navigator: &mut BrowseNavigator, request: BrowseRequest) {
    match state.browse.load(&request.level).await {
        Ok(items) => navigator.apply(request.generation, items),
        Err(e) => navigator.fail(request.generation, &e.to_string()),
    };
}

fn print_buckets(buckets: &[Bucket]) {
    for bucket in buckets {
        println!("{} ({})", bucket.name, bucket.count);
    }
}
