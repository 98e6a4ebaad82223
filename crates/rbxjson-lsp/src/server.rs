//! LSP server implementation

use std::collections::HashMap;
use std::sync::Arc;

use rbxjson_tree::{Node, Parse, Span, parse};
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::debug;

use crate::analyzer::classify;
use crate::completion::{CandidateKind, CompletionCandidate, CompletionGenerator, InsertFormat};
use crate::position::{position_to_offset, span_to_range};
use crate::schema::SchemaStore;

/// Document state tracked by the server
struct DocumentState {
    content: String,
    parse: Parse,
    #[allow(dead_code)]
    version: i32,
}

/// The rbxjson language server
pub struct RbxjsonLanguageServer {
    /// LSP client for sending notifications
    client: Client,
    /// Open documents
    documents: Arc<RwLock<HashMap<Url, DocumentState>>>,
    schema: Arc<dyn SchemaStore>,
}

impl RbxjsonLanguageServer {
    pub fn new(client: Client, schema: Arc<dyn SchemaStore>) -> Self {
        Self {
            client,
            documents: Arc::new(RwLock::new(HashMap::new())),
            schema,
        }
    }

    /// Parse a document, publish its syntax errors and store it.
    async fn update_document(&self, uri: Url, content: String, version: i32) {
        let parsed = parse(&content);
        self.publish_diagnostics(uri.clone(), &content, &parsed, version)
            .await;

        let mut docs = self.documents.write().await;
        docs.insert(
            uri,
            DocumentState {
                content,
                parse: parsed,
                version,
            },
        );
    }

    async fn publish_diagnostics(&self, uri: Url, content: &str, parsed: &Parse, version: i32) {
        let diagnostics = parsed
            .errors
            .iter()
            .map(|error| {
                let mut span = error.span();
                if span.is_empty() && (span.end as usize) < content.len() {
                    span.end += 1;
                }
                Diagnostic {
                    range: span_to_range(content, span),
                    severity: Some(DiagnosticSeverity::ERROR),
                    code: None,
                    code_description: None,
                    source: Some("rbxjson".to_string()),
                    message: error.message.clone(),
                    related_information: None,
                    tags: None,
                    data: None,
                }
            })
            .collect();

        self.client
            .publish_diagnostics(uri, diagnostics, Some(version))
            .await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for RbxjsonLanguageServer {
    async fn initialize(&self, _params: InitializeParams) -> Result<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(vec!["\"".into(), ":".into(), " ".into()]),
                    resolve_provider: Some(false),
                    ..Default::default()
                }),
                document_symbol_provider: Some(OneOf::Left(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "rbxjson-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "rbxjson language server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let document = params.text_document;
        self.update_document(document.uri, document.text, document.version)
            .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        // With FULL sync, we get the entire document content
        if let Some(change) = params.content_changes.into_iter().next() {
            self.update_document(uri, change.text, version).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;

        {
            let mut docs = self.documents.write().await;
            docs.remove(&uri);
        }

        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let docs = self.documents.read().await;
        let Some(doc) = docs.get(&uri) else {
            return Ok(None);
        };

        let offset = position_to_offset(&doc.content, position);
        let ctx = classify(&doc.content, &doc.parse, offset);
        let items: Vec<CompletionItem> = CompletionGenerator::new(self.schema.as_ref())
            .complete(&ctx)
            .into_iter()
            .map(|candidate| completion_item(&doc.content, candidate))
            .collect();

        debug!(%uri, offset, kind = %ctx.kind, items = items.len(), "completion");
        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        let uri = params.text_document.uri;

        let docs = self.documents.read().await;
        let Some(doc) = docs.get(&uri) else {
            return Ok(None);
        };
        let Some(root) = &doc.parse.root else {
            return Ok(None);
        };

        let symbols = collect_document_symbols(root, &doc.content);
        if symbols.is_empty() {
            Ok(None)
        } else {
            Ok(Some(DocumentSymbolResponse::Nested(symbols)))
        }
    }
}

fn completion_item(content: &str, candidate: CompletionCandidate) -> CompletionItem {
    let kind = match candidate.kind {
        CandidateKind::Property => CompletionItemKind::PROPERTY,
        CandidateKind::Class => CompletionItemKind::CLASS,
        CandidateKind::Field => CompletionItemKind::FIELD,
        CandidateKind::TypeParameter => CompletionItemKind::TYPE_PARAMETER,
        CandidateKind::Enum => CompletionItemKind::ENUM,
        CandidateKind::EnumMember => CompletionItemKind::ENUM_MEMBER,
        CandidateKind::Value => CompletionItemKind::VALUE,
        CandidateKind::Keyword => CompletionItemKind::KEYWORD,
        CandidateKind::Snippet => CompletionItemKind::SNIPPET,
        CandidateKind::Event => CompletionItemKind::EVENT,
    };
    let insert_text_format = match candidate.insert_format {
        InsertFormat::Plain => InsertTextFormat::PLAIN_TEXT,
        InsertFormat::Snippet => InsertTextFormat::SNIPPET,
    };

    CompletionItem {
        label: candidate.label,
        kind: Some(kind),
        detail: candidate.detail,
        documentation: candidate.documentation.map(|value| {
            Documentation::MarkupContent(MarkupContent {
                kind: MarkupKind::Markdown,
                value,
            })
        }),
        preselect: candidate.preselect.then_some(true),
        sort_text: Some(candidate.sort_key),
        filter_text: Some(candidate.filter_key),
        insert_text_format: Some(insert_text_format),
        text_edit: Some(CompletionTextEdit::Edit(TextEdit {
            range: span_to_range(content, candidate.replace_range),
            new_text: candidate.insert_text,
        })),
        ..Default::default()
    }
}

/// The outline: the instance (named by its `className`) with one child per
/// property.
fn collect_document_symbols(root: &Node, content: &str) -> Vec<DocumentSymbol> {
    let class_span = rbxjson_tree::find_class_name_span(root);
    let properties = rbxjson_tree::find_property_ranges(root);
    if class_span.is_none() && properties.is_empty() {
        return Vec::new();
    }

    #[allow(deprecated)]
    let children: Vec<DocumentSymbol> = properties
        .into_iter()
        .map(|(name, span)| DocumentSymbol {
            detail: root
                .lookup_str(&["properties", name.as_str(), "type"])
                .map(str::to_string),
            name,
            kind: SymbolKind::PROPERTY,
            tags: None,
            deprecated: None,
            range: span_to_range(content, span),
            selection_range: span_to_range(content, span),
            children: None,
        })
        .collect();

    let name = class_span
        .map(|span| span.slice(content).to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "instance".to_string());
    let selection = class_span.unwrap_or(Span::empty(root.span.start));

    #[allow(deprecated)]
    let symbol = DocumentSymbol {
        name,
        detail: Some("className".to_string()),
        kind: SymbolKind::CLASS,
        tags: None,
        deprecated: None,
        range: span_to_range(content, root.span),
        selection_range: span_to_range(content, selection),
        children: if children.is_empty() {
            None
        } else {
            Some(children)
        },
    };
    vec![symbol]
}

/// Serve the language server over stdin/stdout.
///
/// Logging is the caller's to set up; it must write to stderr.
pub async fn run(schema: Arc<dyn SchemaStore>) -> eyre::Result<()> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) =
        LspService::new(move |client| RbxjsonLanguageServer::new(client, schema));
    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}
