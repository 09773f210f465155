//! Terminal front-end: welcome → join/pending → dashboard with live chat.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use colombia_client::chat::{ApiFeed, ChatState, ChatView, SEND_FAILED, format_message};
use colombia_client::config::ClientConfig;
use colombia_client::dashboard::{Dashboard, parse_tab_command};
use colombia_client::membership::{GateView, JOIN_FAILED, MembershipGate};
use colombia_client::session::{LOGIN_FAILED, SIGNUP_FAILED, SessionStore};
use colombia_client::slot::FileSlot;
use colombia_client::ApiClient;
use colombia_types::models::Member;

type Input = Lines<BufReader<Stdin>>;
type Store = SessionStore<FileSlot>;

enum Flow {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colombia_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env()?;
    let api = ApiClient::new(&config.api_url);
    let slot = FileSlot::new(&config.session_path);
    info!("Using API at {}", api.base_url());
    info!("Session file: {}", slot.path().display());

    let mut store = SessionStore::new(api, slot);
    let mut gate = MembershipGate::new();
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    println!("Carregando...");
    store.init().await;

    loop {
        let flow = match gate.check(&store).await {
            GateView::Loading => anyhow::bail!("session did not settle after init"),
            GateView::Welcome => welcome(&mut store, &mut input).await?,
            GateView::JoinTeam => join_team(&mut store, &mut gate, &mut input).await?,
            GateView::PendingApproval(member) => {
                pending(&mut store, &mut gate, &member, &mut input).await?
            }
            GateView::Dashboard(member) => {
                dashboard(&mut store, &mut gate, member, &config, &mut input).await?
            }
        };

        if let Flow::Quit = flow {
            break;
        }
    }

    Ok(())
}

async fn prompt(input: &mut Input, label: &str) -> anyhow::Result<Option<String>> {
    print!("{label}: ");
    std::io::stdout().flush()?;
    Ok(input.next_line().await?.map(|line| line.trim_end().to_string()))
}

fn logout(store: &mut Store, gate: &mut MembershipGate) -> Flow {
    store.logout();
    gate.invalidate();
    Flow::Continue
}

async fn welcome(store: &mut Store, input: &mut Input) -> anyhow::Result<Flow> {
    println!();
    println!("COLOMBIA");
    println!("Equipe de GTA RP - Entre para a Família");

    let Some(choice) = prompt(input, "[c]adastrar, [e]ntrar ou [s]air").await? else {
        return Ok(Flow::Quit);
    };

    match choice.as_str() {
        "c" => {
            let (Some(name), Some(email), Some(password)) = (
                prompt(input, "Nome completo").await?,
                prompt(input, "Email").await?,
                prompt(input, "Senha").await?,
            ) else {
                return Ok(Flow::Quit);
            };
            if let Err(e) = store.signup(&name, &email, &password).await {
                println!("{}", e.user_message(SIGNUP_FAILED));
            }
        }
        "e" => {
            let (Some(email), Some(password)) =
                (prompt(input, "Email").await?, prompt(input, "Senha").await?)
            else {
                return Ok(Flow::Quit);
            };
            if store.login(&email, &password).await.is_err() {
                println!("{LOGIN_FAILED}");
            }
        }
        "s" => return Ok(Flow::Quit),
        _ => {}
    }

    Ok(Flow::Continue)
}

async fn join_team(
    store: &mut Store,
    gate: &mut MembershipGate,
    input: &mut Input,
) -> anyhow::Result<Flow> {
    println!();
    println!("Complete seu Cadastro");

    let Some(nickname) = prompt(input, "Seu Nickname no GTA RP (/sair para sair)").await? else {
        return Ok(Flow::Quit);
    };
    if nickname == "/sair" {
        return Ok(logout(store, gate));
    }

    println!("Enviando...");
    match gate.join_team(store, &nickname).await {
        Ok(_) => println!("Bem-vindo à Colombia! Sua solicitação foi enviada."),
        Err(e) => println!("{}", e.user_message(JOIN_FAILED)),
    }

    Ok(Flow::Continue)
}

async fn pending(
    store: &mut Store,
    gate: &mut MembershipGate,
    member: &Member,
    input: &mut Input,
) -> anyhow::Result<Flow> {
    println!();
    println!("Aguardando Aprovação");
    println!(
        "Olá {}! Sua solicitação para entrar na equipe Colombia está pendente de aprovação.",
        member.nickname
    );

    match prompt(input, "[s]air da conta ou [q] para fechar").await?.as_deref() {
        Some("s") => Ok(logout(store, gate)),
        Some("q") | None => Ok(Flow::Quit),
        Some(_) => Ok(Flow::Continue),
    }
}

struct MountedChat {
    view: ChatView<ApiFeed>,
    renderer: JoinHandle<()>,
}

impl MountedChat {
    fn mount(store: &Store, config: &ClientConfig) -> anyhow::Result<Self> {
        let view = ChatView::mount(ApiFeed::from_store(store)?, config.poll_interval);
        let renderer = tokio::spawn(render_chat(view.subscribe()));
        Ok(Self { view, renderer })
    }

    fn unmount(self) {
        self.renderer.abort();
        self.view.unmount();
    }
}

async fn render_chat(mut rx: watch::Receiver<ChatState>) {
    let mut shown: Vec<String> = Vec::new();
    let mut last_error: Option<String> = None;

    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();

        if state.error != last_error {
            if let Some(err) = &state.error {
                println!("! {err}");
            }
            last_error = state.error.clone();
        }

        let ids: Vec<String> = state.messages.iter().map(|m| m.id.clone()).collect();
        if ids == shown {
            continue;
        }
        if state.messages.is_empty() {
            println!("Chat vazio. Seja o primeiro a falar!");
        }
        for msg in &state.messages {
            println!("{}", format_message(msg));
        }
        shown = ids;
    }
}

fn print_tabs(dash: &Dashboard) {
    let tabs: Vec<String> = dash
        .tabs()
        .into_iter()
        .map(|tab| {
            if tab == dash.active() {
                format!("[{}]", tab.label())
            } else {
                tab.label().to_string()
            }
        })
        .collect();
    println!("{}", tabs.join(" | "));
}

async fn dashboard(
    store: &mut Store,
    gate: &mut MembershipGate,
    member: Member,
    config: &ClientConfig,
    input: &mut Input,
) -> anyhow::Result<Flow> {
    let mut dash = Dashboard::new(member)?;
    println!();
    println!("{}", dash.header());
    print_tabs(&dash);
    println!("Comandos: /aba <chat|clips|highlights|war|admin>, /sair, /fechar");

    let mut chat = Some(MountedChat::mount(store, config)?);

    let flow = loop {
        let Some(line) = input.next_line().await? else {
            break Flow::Quit;
        };

        if let Some(parsed) = parse_tab_command(&line) {
            let selected = parsed.and_then(|tab| dash.select(tab));
            if let Err(e) = selected {
                println!("{e}");
                continue;
            }
            print_tabs(&dash);

            match dash.placeholder() {
                Some(placeholder) => {
                    if let Some(mounted) = chat.take() {
                        mounted.unmount();
                    }
                    println!("{}", placeholder.title);
                    println!("{}", placeholder.note);
                }
                None if chat.is_none() => chat = Some(MountedChat::mount(store, config)?),
                None => {}
            }
            continue;
        }

        match line.trim() {
            "/sair" => break logout(store, gate),
            "/fechar" => break Flow::Quit,
            _ => {}
        }

        match &chat {
            Some(mounted) => {
                if let Err(e) = mounted.view.send(&line).await {
                    println!("{}", e.user_message(SEND_FAILED));
                }
            }
            None => println!("Abra o chat com /aba chat para enviar mensagens."),
        }
    };

    if let Some(mounted) = chat.take() {
        mounted.unmount();
    }
    Ok(flow)
}
