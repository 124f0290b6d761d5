//! Prompt text for the classification call.

/// System role for the classification call.
pub const CLASSIFY_SYSTEM_PROMPT: &str =
    "Você é um classificador de emails corporativos, objetivo e preciso.";

/// Fixed instructions placed before the email body.
const CLASSIFY_INSTRUCTIONS: &str = "\
Classifique o email abaixo em exatamente uma de duas categorias.

1. **Produtivo**: o email exige uma ação ou resposta específica.
   - pedidos de suporte técnico
   - atualizações sobre casos em aberto
   - dúvidas sobre o sistema
   - pedidos de informação
   - solicitações de alteração
   - problemas que precisam ser resolvidos

2. **Improdutivo**: o email não exige ação imediata.
   - felicitações (aniversário, Natal, Ano Novo etc.)
   - agradecimentos genéricos
   - mensagens apenas informativas
   - spam ou conteúdo irrelevante

Responda SOMENTE com \"Produtivo\" ou \"Improdutivo\", seguido da sua confiança \
como um número entre 0 e 1 (exemplo: \"Produtivo 0.95\").

Email:
";

/// Build the user prompt: instructions followed by the raw email text.
pub fn classification_user_prompt(email_text: &str) -> String {
    let mut prompt = String::with_capacity(CLASSIFY_INSTRUCTIONS.len() + email_text.len());
    prompt.push_str(CLASSIFY_INSTRUCTIONS);
    prompt.push_str(email_text);
    prompt
}
