use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::CredentialError;

/// Base context every verifiable credential must declare first.
pub const VC_CONTEXT_V1: &str = "https://www.w3.org/2018/credentials/v1";
/// Mandatory credential type.
pub const VC_TYPE: &str = "VerifiableCredential";

/// A structurally validated verifiable credential.
///
/// The raw JSON object is kept so proofs can be checked against exactly
/// what the issuer signed.
#[derive(Debug, Clone)]
pub struct Credential {
    pub id: Option<String>,
    pub types: Vec<String>,
    pub issuer: String,
    pub issuance_date: DateTime<Utc>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub subjects: Vec<CredentialSubject>,
    proofs: Vec<Value>,
    raw: Map<String, Value>,
}

/// One entry of `credentialSubject`.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialSubject {
    pub id: Option<String>,
    /// Every field except `id`.
    pub custom_fields: Map<String, Value>,
}

/// An embedded linked-data proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    pub proof_type: String,
    pub purpose: String,
    pub verification_method: String,
    pub created: Option<DateTime<Utc>>,
    pub signature: Vec<u8>,
}

impl Credential {
    /// Parse raw bytes and validate the credential shape.
    pub fn parse(raw: &[u8]) -> Result<Self, CredentialError> {
        let value: Value = serde_json::from_slice(raw)
            .map_err(|e| CredentialError::Malformed(format!("invalid JSON: {}", e)))?;
        let Value::Object(map) = value else {
            return Err(CredentialError::Malformed(
                "credential must be a JSON object".into(),
            ));
        };
        Self::from_map(map)
    }

    fn from_map(raw: Map<String, Value>) -> Result<Self, CredentialError> {
        let contexts = string_or_array(raw.get("@context"), "@context")?;
        if contexts.first().map(String::as_str) != Some(VC_CONTEXT_V1) {
            return Err(CredentialError::Malformed(format!(
                "first @context must be {}",
                VC_CONTEXT_V1
            )));
        }

        let types = string_or_array(raw.get("type"), "type")?;
        if !types.iter().any(|t| t == VC_TYPE) {
            return Err(CredentialError::Malformed(format!(
                "type must include {}",
                VC_TYPE
            )));
        }

        let id = match raw.get("id") {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err(CredentialError::Malformed("id must be a string".into())),
        };

        let issuer = match raw.get("issuer") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Object(obj)) => match obj.get("id") {
                Some(Value::String(s)) => s.clone(),
                _ => {
                    return Err(CredentialError::Malformed(
                        "issuer object must carry a string id".into(),
                    ))
                }
            },
            _ => return Err(CredentialError::Malformed("missing issuer".into())),
        };

        let issuance_date = match raw.get("issuanceDate") {
            Some(v) => parse_date(v, "issuanceDate")?,
            None => return Err(CredentialError::Malformed("missing issuanceDate".into())),
        };
        let expiration_date = raw
            .get("expirationDate")
            .map(|v| parse_date(v, "expirationDate"))
            .transpose()?;

        let subjects = match raw.get("credentialSubject") {
            Some(Value::Object(obj)) => vec![CredentialSubject::from_map(obj)?],
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::Object(obj) => CredentialSubject::from_map(obj),
                    _ => Err(CredentialError::Malformed(
                        "credentialSubject entries must be objects".into(),
                    )),
                })
                .collect::<Result<Vec<_>, _>>()?,
            _ => {
                return Err(CredentialError::Malformed(
                    "missing credentialSubject".into(),
                ))
            }
        };

        let proofs = match raw.get("proof") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.clone(),
            Some(other) => vec![other.clone()],
        };

        Ok(Self {
            id,
            types,
            issuer,
            issuance_date,
            expiration_date,
            subjects,
            proofs,
            raw,
        })
    }

    /// Embedded proofs, as found in the document.
    pub fn raw_proofs(&self) -> &[Value] {
        &self.proofs
    }

    /// The document without its `proof` member, i.e. what was signed.
    pub fn unsigned_document(&self) -> Value {
        let mut doc = self.raw.clone();
        doc.remove("proof");
        Value::Object(doc)
    }
}

impl CredentialSubject {
    fn from_map(obj: &Map<String, Value>) -> Result<Self, CredentialError> {
        let id = match obj.get("id") {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                return Err(CredentialError::Malformed(
                    "credentialSubject id must be a string".into(),
                ))
            }
        };
        let mut custom_fields = obj.clone();
        custom_fields.remove("id");
        Ok(Self { id, custom_fields })
    }

    /// Read a custom claim that must be a string.
    pub fn string_claim(&self, key: &str) -> Result<&str, CredentialError> {
        match self.custom_fields.get(key) {
            None => Err(CredentialError::ExtractClaimFailed(format!(
                "key '{}' not found",
                key
            ))),
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(CredentialError::ExtractClaimFailed(format!(
                "key '{}' is not a string",
                key
            ))),
        }
    }
}

impl Proof {
    /// Build a proof from its JSON representation.
    pub fn from_value(value: &Value) -> Result<Self, CredentialError> {
        let obj = value
            .as_object()
            .ok_or_else(|| CredentialError::InvalidProof("proof must be an object".into()))?;

        let field = |name: &str| -> Result<String, CredentialError> {
            obj.get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| CredentialError::InvalidProof(format!("missing {}", name)))
        };

        let proof_type = field("type")?;
        let purpose = field("proofPurpose")?;
        let verification_method = field("verificationMethod")?;

        let created = obj
            .get("created")
            .map(|v| {
                parse_date(v, "created").map_err(|e| CredentialError::InvalidProof(e.to_string()))
            })
            .transpose()?;

        if obj.contains_key("jws") && !obj.contains_key("proofValue") {
            return Err(CredentialError::InvalidProof(
                "detached JWS proofs are not supported".into(),
            ));
        }
        let proof_value = field("proofValue")?;
        let encoded = proof_value.strip_prefix('z').ok_or_else(|| {
            CredentialError::InvalidProof("proofValue must be multibase base58btc".into())
        })?;
        let signature = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| CredentialError::InvalidProof(format!("invalid proofValue: {}", e)))?;

        Ok(Self {
            proof_type,
            purpose,
            verification_method,
            created,
            signature,
        })
    }

    /// The DID part of the verification method.
    pub fn controller(&self) -> &str {
        self.verification_method
            .split_once('#')
            .map(|(did, _)| did)
            .unwrap_or(&self.verification_method)
    }
}

fn string_or_array(value: Option<&Value>, field: &str) -> Result<Vec<String>, CredentialError> {
    match value {
        Some(Value::String(s)) => Ok(vec![s.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => Ok(s.clone()),
                // Embedded context definitions are allowed after the base context.
                Value::Object(_) if field == "@context" => Ok(String::new()),
                _ => Err(CredentialError::Malformed(format!(
                    "{} entries must be strings",
                    field
                ))),
            })
            .collect(),
        _ => Err(CredentialError::Malformed(format!("missing {}", field))),
    }
}

fn parse_date(value: &Value, field: &str) -> Result<DateTime<Utc>, CredentialError> {
    let s = value
        .as_str()
        .ok_or_else(|| CredentialError::Malformed(format!("{} must be a string", field)))?;
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| CredentialError::Malformed(format!("invalid {}: {}", field, e)))
}
