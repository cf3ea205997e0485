use clap::{Args, Subcommand};

use studyshare_core::constants::DEFAULT_REQUEST_GRADE;
use studyshare_core::materials::RecordId;
use studyshare_core::requests::{
    MaterialRequest, NewMaterialRequest, RequestBoard, RequestServiceTrait,
};

use crate::main_lib::AppState;

#[derive(Args, Debug)]
pub struct RequestsArgs {
    #[command(subcommand)]
    pub command: RequestsCommand,
}

#[derive(Subcommand, Debug)]
pub enum RequestsCommand {
    /// Show requests, newest first
    List {
        /// Hide fulfilled requests
        #[arg(long)]
        open: bool,
    },
    /// Ask for a material
    Post {
        #[arg(long)]
        name: String,
        #[arg(long)]
        subject: String,
        #[arg(long, default_value = DEFAULT_REQUEST_GRADE)]
        grade: String,
        #[arg(long)]
        note: String,
    },
    /// Upvote a request
    Upvote { id: RecordId },
}

pub async fn run(state: &AppState, args: RequestsArgs) -> anyhow::Result<()> {
    match args.command {
        RequestsCommand::List { open } => {
            let board = RequestBoard::new(state.requests.list_requests().await?);
            let shown: Vec<&MaterialRequest> = if open {
                board.open_requests().collect()
            } else {
                board.requests.iter().collect()
            };
            if shown.is_empty() {
                println!("No requests yet.");
            }
            for request in shown {
                print_request(request);
            }
        }
        RequestsCommand::Post {
            name,
            subject,
            grade,
            note,
        } => {
            let request = state
                .requests
                .post_request(NewMaterialRequest {
                    student_name: name,
                    subject,
                    grade,
                    note_content: note,
                })
                .await?;
            println!("Request posted:");
            print_request(&request);
        }
        RequestsCommand::Upvote { id } => {
            let mut board = RequestBoard::new(state.requests.list_requests().await?);
            state.requests.upvote_on_board(&mut board, &id).await;
            match board.requests.iter().find(|r| r.id == id) {
                Some(request) => print_request(request),
                None => anyhow::bail!("No request with id {}", id),
            }
        }
    }
    Ok(())
}

fn print_request(request: &MaterialRequest) {
    let status = if request.fulfilled { "fulfilled" } else { "open" };
    println!(
        "[{}] {} ({}) | {} upvotes | {} | by {}",
        request.id,
        request.subject,
        request.grade,
        request.upvotes,
        status,
        request.student_name.as_deref().unwrap_or("-")
    );
    if let Some(note) = request.note_content.as_deref().filter(|n| !n.is_empty()) {
        println!("    {}", note);
    }
}
