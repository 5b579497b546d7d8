//! 交互式终端 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：加载配置、初始化日志文件、创建模型客户端和编排器
//! 2. **命令循环**：逐行读取标准输入，翻译成编排器的迁移操作
//! 3. **进度显示**：订阅状态快照，在后台任务中打印进度
//! 4. **视图与导出**：持有当前标签页，调用展示层渲染或导出报告
//!
//! 终端本身不修改会话状态，所有状态变化都经过 `Orchestrator`

use crate::config::Config;
use crate::error::{AppError, SelectionError, StateError};
use crate::infrastructure::{GeminiClient, GenerativeModel};
use crate::models::{ProcessStatus, SessionSnapshot, PDF_MEDIA_TYPE};
use crate::orchestrator::session::{limit_notice, Orchestrator};
use crate::presentation::{render_tab, write_report_today, Tab};
use crate::utils::logging::{init_log_file, log_startup};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{error, warn};

const HELP: &str = "Comandos:
  add <caminho>...   adicionar PDFs (um diretório adiciona todos os PDFs dele)
  remove <n>         remover o n-ésimo arquivo selecionado
  list               listar arquivos selecionados
  start              iniciar a análise sistemática
  tab <aba>          mostrar uma aba do relatório (individual | matrix | synthesis)
  export             exportar o relatório em Markdown
  status             mostrar o estado atual
  reset              limpar tudo e iniciar nova síntese
  help               mostrar esta ajuda
  quit               sair";

/// 终端命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Vec<PathBuf>),
    Remove(usize),
    List,
    Start,
    Tab(Tab),
    Export,
    Status,
    Reset,
    Help,
    Quit,
}

impl Command {
    /// 解析一行输入，空行返回 `Ok(None)`
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(n, r)| (n, r.trim()));

        let command = match name.to_lowercase().as_str() {
            "add" => Command::Add(parse_paths(rest)?),
            "remove" => {
                let n: usize = rest
                    .parse()
                    .map_err(|_| format!("número inválido: '{}'", rest))?;
                if n == 0 {
                    return Err("a numeração começa em 1".to_string());
                }
                Command::Remove(n - 1)
            }
            "list" => Command::List,
            "start" => Command::Start,
            "tab" => Command::Tab(rest.parse()?),
            "export" => Command::Export,
            "status" => Command::Status,
            "reset" => Command::Reset,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("comando desconhecido: '{}'", other)),
        };

        Ok(Some(command))
    }
}

/// 整段是一个已存在的路径时按单个路径处理（允许空格），否则按空白切分
fn parse_paths(rest: &str) -> Result<Vec<PathBuf>, String> {
    if rest.is_empty() {
        return Err("informe ao menos um caminho".to_string());
    }
    if Path::new(rest).exists() {
        return Ok(vec![PathBuf::from(rest)]);
    }
    Ok(rest.split_whitespace().map(PathBuf::from).collect())
}

/// 展开目录：目录下的所有条目都作为候选，非 PDF 会在编排器中被跳过
async fn expand_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut expanded = Vec::new();
    for path in paths {
        if !path.is_dir() {
            expanded.push(path);
            continue;
        }

        match tokio::fs::read_dir(&path).await {
            Ok(mut entries) => {
                let mut found = Vec::new();
                while let Ok(Some(entry)) = entries.next_entry().await {
                    found.push(entry.path());
                }
                found.sort();
                expanded.extend(found);
            }
            Err(e) => warn!("无法读取文件夹 {}: {}", path.display(), e),
        }
    }
    expanded
}

/// 应用主结构
pub struct App {
    config: Config,
    orchestrator: Orchestrator,
    active_tab: Tab,
}

impl App {
    /// 初始化应用
    ///
    /// 日志文件不可写时只输出到控制台，不影响启动
    pub async fn initialize(config: Config) -> Self {
        let header = init_log_file(&config.output_log_file);
        crate::logger::init_with_file(&config.output_log_file);
        if let Err(e) = header {
            warn!("⚠️ 无法写入日志文件 {}: {}", config.output_log_file, e);
        }

        let model: Arc<dyn GenerativeModel> = Arc::new(GeminiClient::new(&config));
        log_startup(model.model_name(), config.max_files);

        Self::with_model(config, model)
    }

    /// 使用指定模型创建应用
    pub fn with_model(config: Config, model: Arc<dyn GenerativeModel>) -> Self {
        let orchestrator = Orchestrator::new(model, config.max_files);
        Self {
            config,
            orchestrator,
            active_tab: Tab::default(),
        }
    }

    /// 运行命令循环，直到 `quit` 或输入结束
    pub async fn run(mut self) -> Result<()> {
        let progress_task = tokio::spawn(print_progress(self.orchestrator.subscribe()));

        println!("Acadêmico IA - Síntese de Evidências Acadêmicas");
        println!(
            "Selecione de 1 a {} artigos ({}). Digite 'help' para ver os comandos.",
            self.config.max_files, PDF_MEDIA_TYPE
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            match Command::parse(&line) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => self.execute(command).await,
                Ok(None) => {}
                Err(msg) => println!("{}", msg),
            }
        }

        progress_task.abort();
        Ok(())
    }

    /// 执行一条命令，所有错误都转换为用户提示
    pub async fn execute(&mut self, command: Command) {
        if let Err(e) = self.dispatch(command).await {
            println!("{}", self.user_message(&e));
        }
    }

    async fn dispatch(&mut self, command: Command) -> Result<(), AppError> {
        match command {
            Command::Add(paths) => {
                let candidates = expand_paths(paths).await;
                let added = self.orchestrator.add_files(candidates)?;
                println!(
                    "{} arquivo(s) adicionado(s). Arquivos Selecionados ({}).",
                    added,
                    self.orchestrator.files().len()
                );
            }
            Command::Remove(index) => {
                let removed = self.orchestrator.remove_file(index)?;
                println!("Removido: {}", removed.name);
            }
            Command::List => print_files(&self.orchestrator.snapshot()),
            Command::Start => match self.orchestrator.start().await? {
                ProcessStatus::Completed => {
                    self.active_tab = Tab::default();
                    println!("Análise concluída. Use 'tab' para ver o relatório ou 'export' para salvar.");
                }
                _ => print_status(&self.orchestrator.snapshot()),
            },
            Command::Tab(tab) => {
                let report = self.completed_report("tab")?;
                self.active_tab = tab;
                println!("== {} ==\n{}", tab.label(), render_tab(&report, tab));
            }
            Command::Export => {
                let report = self.completed_report("export")?;
                let path = write_report_today(&report, Path::new(&self.config.output_dir)).await?;
                println!("Relatório exportado: {}", path.display());
            }
            Command::Status => print_status(&self.orchestrator.snapshot()),
            Command::Reset => {
                self.orchestrator.reset();
                self.active_tab = Tab::default();
                println!("Sessão reiniciada.");
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => {}
        }
        Ok(())
    }

    fn completed_report(
        &self,
        operation: &'static str,
    ) -> Result<Arc<crate::models::SynthesisReport>, AppError> {
        let snapshot = self.orchestrator.snapshot();
        snapshot.report.ok_or_else(|| {
            StateError::NotAllowed {
                status: snapshot.status.as_str(),
                operation,
            }
            .into()
        })
    }

    fn user_message(&self, err: &AppError) -> String {
        match err {
            AppError::Selection(SelectionError::LimitExceeded { max, .. }) => limit_notice(*max),
            AppError::Selection(SelectionError::NoFiles) => {
                "Selecione ao menos um arquivo PDF.".to_string()
            }
            AppError::Selection(SelectionError::IndexOutOfRange { len, .. }) => {
                format!("Número inválido: há {} arquivo(s) selecionado(s).", len)
            }
            AppError::State(_) => "Operação indisponível no estado atual.".to_string(),
            other => {
                error!("命令执行失败: {}", other);
                "Não foi possível concluir a operação.".to_string()
            }
        }
    }
}

/// 订阅快照并打印进度
async fn print_progress(mut rx: watch::Receiver<SessionSnapshot>) {
    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();
        match snapshot.status {
            ProcessStatus::Extracting if snapshot.progress.current > 0 => println!(
                "Extraindo evidências acadêmicas... artigo {} de {} ({}%)",
                snapshot.progress.current,
                snapshot.progress.total,
                snapshot.progress.percent()
            ),
            ProcessStatus::Synthesizing => println!(
                "Gerando síntese sistemática... consolidando achados, padrões e divergências."
            ),
            _ => {}
        }
    }
}

fn print_files(snapshot: &SessionSnapshot) {
    if snapshot.files.is_empty() {
        println!("Nenhum arquivo selecionado.");
        return;
    }
    println!("Arquivos Selecionados ({}):", snapshot.files.len());
    for (i, name) in snapshot.files.iter().enumerate() {
        println!("  {}. {}", i + 1, name);
    }
}

fn print_status(snapshot: &SessionSnapshot) {
    println!("Estado: {}", snapshot.status);
    if snapshot.status == ProcessStatus::Extracting {
        println!("Progresso: {}", snapshot.progress);
    }
    if let Some(error) = &snapshot.error {
        println!("{}", error);
    }
    if let Some(report) = &snapshot.report {
        println!("Relatório com {} análise(s).", report.analyses.len());
    }
}
